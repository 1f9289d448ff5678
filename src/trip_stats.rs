// trip_stats.rs
use crate::selection_set::capitalize;
use crate::trip_filter::FilteredView;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Result of one statistic. `NoData` covers an empty view as well as an
/// attribute that none of the trips in the view carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Stat<T> {
    Value(T),
    NoData,
}

impl<T> Stat<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Stat::Value(value) => Some(value),
            Stat::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Stat::NoData)
    }
}

impl<T> From<Option<T>> for Stat<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Stat::NoData, Stat::Value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

/// Station names repeat across cities, so a station always travels with its city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityStation {
    pub station: String,
    pub city: String,
}

impl fmt::Display for CityStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.station, capitalize(&self.city))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityTrip {
    pub from: String,
    pub to: String,
    pub city: String,
}

impl fmt::Display for CityTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from {} to {} in {}",
            self.from,
            self.to,
            capitalize(&self.city)
        )
    }
}

// Counts in first-seen order.
fn tally<K, I>(values: I) -> Vec<Counted<K>>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<Counted<K>> = Vec::new();
    for value in values {
        match positions.get(&value) {
            Some(&position) => counts[position].count += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push(Counted { value, count: 1 });
            }
        }
    }
    counts
}

/// The most frequent value. On a tie the value seen first in the view wins.
fn most_common<K, I>(values: I) -> Stat<Counted<K>>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut best: Option<Counted<K>> = None;
    for counted in tally(values) {
        if best.as_ref().map_or(true, |best| counted.count > best.count) {
            best = Some(counted);
        }
    }
    best.into()
}

/// Counts by descending frequency, ties in first-seen order.
fn ranked<K, I>(values: I) -> Stat<Vec<Counted<K>>>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts = tally(values);
    if counts.is_empty() {
        return Stat::NoData;
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Stat::Value(counts)
}

pub fn hour_window(hour: u32) -> String {
    format!("{}:00 to {}:00", hour, hour + 1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeStats {
    /// 1 is January
    pub month: Stat<Counted<u32>>,
    /// 0 is Sunday
    pub day_of_week: Stat<Counted<u32>>,
    pub hour: Stat<Counted<u32>>,
}

pub fn time_stats(view: &FilteredView<'_>) -> TimeStats {
    TimeStats {
        month: most_common(view.iter().map(|trip| trip.month)),
        day_of_week: most_common(view.iter().map(|trip| trip.day_of_week)),
        hour: most_common(view.iter().map(|trip| trip.hour)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub start_station: Stat<Counted<CityStation>>,
    pub end_station: Stat<Counted<CityStation>>,
    pub trip: Stat<Counted<CityTrip>>,
}

pub fn station_stats(view: &FilteredView<'_>) -> StationStats {
    StationStats {
        start_station: most_common(view.iter().map(|trip| CityStation {
            station: trip.start_station.clone(),
            city: trip.city.clone(),
        })),
        end_station: most_common(view.iter().map(|trip| CityStation {
            station: trip.end_station.clone(),
            city: trip.city.clone(),
        })),
        trip: most_common(view.iter().map(|trip| CityTrip {
            from: trip.start_station.clone(),
            to: trip.end_station.clone(),
            city: trip.city.clone(),
        })),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DurationSummary {
    /// seconds
    pub total: f64,
    /// seconds
    pub mean: f64,
    /// trips that had a usable duration
    pub trips: usize,
}

pub fn duration_stats(view: &FilteredView<'_>) -> Stat<DurationSummary> {
    let durations: Vec<f64> = view.iter().filter_map(|trip| trip.trip_duration).collect();
    if durations.is_empty() {
        return Stat::NoData;
    }
    let total: f64 = durations.iter().sum();
    Stat::Value(DurationSummary {
        total,
        mean: total / durations.len() as f64,
        trips: durations.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYearSummary {
    pub earliest: i32,
    pub latest: i32,
    /// Ties go to the earliest year.
    pub most_common: Counted<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub user_types: Stat<Vec<Counted<String>>>,
    pub genders: Stat<Vec<Counted<String>>>,
    pub birth_years: Stat<BirthYearSummary>,
}

fn birth_year_summary(years: Vec<i32>) -> Stat<BirthYearSummary> {
    let (Some(&earliest), Some(&latest)) = (years.iter().min(), years.iter().max()) else {
        return Stat::NoData;
    };
    let counts = tally(years);
    let top = counts.iter().map(|counted| counted.count).max().unwrap_or(0);
    let most_common = counts
        .into_iter()
        .filter(|counted| counted.count == top)
        .min_by_key(|counted| counted.value);
    match most_common {
        Some(most_common) => Stat::Value(BirthYearSummary {
            earliest,
            latest,
            most_common,
        }),
        None => Stat::NoData,
    }
}

pub fn user_stats(view: &FilteredView<'_>) -> UserStats {
    UserStats {
        user_types: ranked(view.iter().filter_map(|trip| trip.user_type.clone())),
        genders: ranked(view.iter().filter_map(|trip| trip.gender.clone())),
        birth_years: birth_year_summary(view.iter().filter_map(|trip| trip.birth_year).collect()),
    }
}

/// All four statistic blocks for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: Stat<DurationSummary>,
    pub users: UserStats,
}

pub fn summarize(view: &FilteredView<'_>) -> TripSummary {
    TripSummary {
        time: time_stats(view),
        stations: station_stats(view),
        durations: duration_stats(view),
        users: user_stats(view),
    }
}
