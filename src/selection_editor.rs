// selection_editor.rs
use crate::error::{BroError, Result};
use crate::selection_set::{capitalize, normalize, Category, SelectionSet};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// One change to a selection, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEdit {
    SelectAll,
    Add(String),
    Remove(String),
    SelectOnly(String),
}

fn command_regex() -> &'static Regex {
    static COMMAND: OnceLock<Regex> = OnceLock::new();
    COMMAND.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(select\s+all|select\s+only|only|add|remove|omit|n|a|o|f)(?:\s+(.*?))?\s*$",
        )
        .expect("command pattern is valid")
    })
}

impl SelectionEdit {
    /// Parses `select all`, `add <v>`, `remove <v>` and `select only <v>`.
    /// The one-letter keys of the old menu (`n`, `a`, `o`, `f`) work too.
    pub fn parse(input: &str) -> Result<Self> {
        let unknown = || BroError::UnknownCommand(input.trim().to_string());
        let captures = command_regex().captures(input).ok_or_else(unknown)?;

        let verb = captures
            .get(1)
            .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
            .to_lowercase();
        let value = captures
            .get(2)
            .map(|m| normalize(m.as_str()))
            .filter(|value| !value.is_empty());

        match (verb.as_str(), value) {
            ("select all" | "n", None) => Ok(SelectionEdit::SelectAll),
            ("add" | "a", Some(value)) => Ok(SelectionEdit::Add(value)),
            ("remove" | "omit" | "o", Some(value)) => Ok(SelectionEdit::Remove(value)),
            ("select only" | "only" | "f", Some(value)) => Ok(SelectionEdit::SelectOnly(value)),
            _ => Err(unknown()),
        }
    }

    /// Returns the edited copy of `set`. On error `set` is the state to keep.
    pub fn apply(&self, set: &SelectionSet) -> Result<SelectionSet> {
        let mut updated = set.clone();
        match self {
            SelectionEdit::SelectAll => updated.set_all(true),
            SelectionEdit::Add(value) => {
                let index = set.position(value).ok_or_else(|| set.unknown_value(value))?;
                updated.set_flag(index, true);
            }
            SelectionEdit::Remove(value) => {
                let index = set.position(value).ok_or_else(|| set.unknown_value(value))?;
                updated.set_flag(index, false);
                if updated.selected_count() == 0 {
                    warn!(
                        category = %set.category(),
                        value = %value,
                        "refusing to empty selection"
                    );
                    return Err(BroError::WouldEmptySelection {
                        category: set.category().singular().to_string(),
                        value: normalize(value),
                    });
                }
            }
            SelectionEdit::SelectOnly(value) => {
                let index = set.position(value).ok_or_else(|| set.unknown_value(value))?;
                updated.set_all(false);
                updated.set_flag(index, true);
            }
        }
        Ok(updated)
    }
}

/// The three selections driving one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    cities: SelectionSet,
    months: SelectionSet,
    days: SelectionSet,
}

impl FilterState {
    pub fn new<I, S>(city_universe: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            cities: SelectionSet::cities(city_universe)?,
            months: SelectionSet::months(),
            days: SelectionSet::days(),
        })
    }

    pub fn cities(&self) -> &SelectionSet {
        &self.cities
    }

    pub fn months(&self) -> &SelectionSet {
        &self.months
    }

    pub fn days(&self) -> &SelectionSet {
        &self.days
    }

    pub fn get(&self, category: Category) -> &SelectionSet {
        match category {
            Category::Cities => &self.cities,
            Category::Months => &self.months,
            Category::Days => &self.days,
        }
    }

    /// Starts the city selection over on a new universe, all selected.
    /// On error the old city selection is kept.
    pub fn replace_city_universe<I, S>(&mut self, city_universe: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cities = SelectionSet::cities(city_universe)?;
        Ok(())
    }

    /// Applies `edit` to one category. A rejected edit leaves the state as it was.
    pub fn apply(&mut self, category: Category, edit: &SelectionEdit) -> Result<()> {
        let updated = edit.apply(self.get(category))?;
        match category {
            Category::Cities => self.cities = updated,
            Category::Months => self.months = updated,
            Category::Days => self.days = updated,
        }
        Ok(())
    }

    /// One line per category: `all`, or the selected values.
    pub fn describe(&self) -> Vec<String> {
        Category::ALL
            .iter()
            .map(|category| {
                let set = self.get(*category);
                let listing = if set.is_all() {
                    "all".to_string()
                } else {
                    set.members()
                        .into_iter()
                        .map(capitalize)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                format!("{}: {}", capitalize(category.plural()), listing)
            })
            .collect()
    }
}
