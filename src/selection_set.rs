// selection_set.rs
use crate::error::{BroError, Result};
use std::fmt;

pub const ALL_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Declared order of the day universe. Numbering is separate, see `day_number`.
pub const ALL_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const DEFAULT_CITIES: [&str; 3] = ["chicago", "new york city", "washington"];

// Day numbers count from Sunday, matching chrono's num_days_from_sunday.
const DAY_NUMBERS: [(&str, u32); 7] = [
    ("sunday", 0),
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
];

pub fn month_number(name: &str) -> Option<u32> {
    let name = normalize(name);
    ALL_MONTHS
        .iter()
        .position(|month| *month == name)
        .map(|index| index as u32 + 1)
}

pub fn month_name(number: u32) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| ALL_MONTHS.get(index as usize))
        .copied()
}

pub fn day_number(name: &str) -> Option<u32> {
    let name = normalize(name);
    DAY_NUMBERS
        .iter()
        .find(|(day, _)| *day == name)
        .map(|(_, number)| *number)
}

pub fn day_name(number: u32) -> Option<&'static str> {
    DAY_NUMBERS
        .iter()
        .find(|(_, n)| *n == number)
        .map(|(day, _)| *day)
}

/// Lookups are case-insensitive and ignore surrounding whitespace.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Turns "new york city" into "New york city", the way results name things.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cities,
    Months,
    Days,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Cities, Category::Months, Category::Days];

    pub fn singular(&self) -> &'static str {
        match self {
            Category::Cities => "city",
            Category::Months => "month",
            Category::Days => "day",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Category::Cities => "cities",
            Category::Months => "months",
            Category::Days => "days",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// Membership flags over a closed, ordered universe of category values.
///
/// At least one flag is always `true`. Flags can only be flipped through
/// `SelectionEdit`, which refuses any change that would clear the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    category: Category,
    members: Vec<(String, bool)>,
}

impl SelectionSet {
    /// Builds a set with every member selected. Values are normalized and
    /// duplicates dropped; a universe that ends up empty is refused.
    pub fn new<I, S>(category: Category, universe: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members: Vec<(String, bool)> = Vec::new();
        for value in universe {
            let value = normalize(value.as_ref());
            if !value.is_empty() && !members.iter().any(|(existing, _)| *existing == value) {
                members.push((value, true));
            }
        }
        if members.is_empty() {
            return Err(BroError::EmptyUniverse(category.singular().to_string()));
        }
        Ok(Self { category, members })
    }

    pub fn cities<I, S>(universe: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Category::Cities, universe)
    }

    fn fixed(category: Category, universe: &[&str]) -> Self {
        Self {
            category,
            members: universe.iter().map(|value| (value.to_string(), true)).collect(),
        }
    }

    pub fn months() -> Self {
        Self::fixed(Category::Months, &ALL_MONTHS)
    }

    pub fn days() -> Self {
        Self::fixed(Category::Days, &ALL_DAYS)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn universe(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(value, _)| value.as_str())
    }

    pub fn is_member(&self, value: &str) -> Result<bool> {
        self.position(value)
            .map(|index| self.members[index].1)
            .ok_or_else(|| BroError::InvalidValue {
                category: self.category.singular().to_string(),
                value: value.to_string(),
            })
    }

    /// Selected values, in universe order.
    pub fn members(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(value, _)| value.as_str())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.members.iter().filter(|(_, selected)| *selected).count()
    }

    pub fn is_all(&self) -> bool {
        self.members.iter().all(|(_, selected)| *selected)
    }

    pub(crate) fn position(&self, value: &str) -> Option<usize> {
        let value = normalize(value);
        self.members.iter().position(|(member, _)| *member == value)
    }

    pub(crate) fn set_flag(&mut self, index: usize, selected: bool) {
        self.members[index].1 = selected;
    }

    pub(crate) fn set_all(&mut self, selected: bool) {
        for member in self.members.iter_mut() {
            member.1 = selected;
        }
    }

    pub(crate) fn unknown_value(&self, value: &str) -> BroError {
        BroError::UnknownValue {
            category: self.category.singular().to_string(),
            value: value.to_string(),
            universe: self.universe().map(String::from).collect(),
        }
    }
}
