// trip_presenter.rs
use crate::selection_editor::FilterState;
use crate::selection_set::{capitalize, day_name, month_name};
use crate::trip_filter::FilteredView;
use crate::trip_loader::TripRecord;
use crate::trip_stats::{
    duration_stats, hour_window, station_stats, time_stats, user_stats, Counted, DurationSummary,
    Stat, StationStats, TimeStats, UserStats,
};
use crate::user_interaction::{print_insight, print_insight_level_2};
use rand::Rng;
use std::time::Instant;

const NO_DATA: &str = "no data";

fn divider() {
    println!("{}", "-".repeat(40));
}

fn name_or_number(name: Option<&str>, number: u32) -> String {
    name.map(capitalize).unwrap_or_else(|| number.to_string())
}

pub fn print_current_filter(state: &FilterState) {
    print_insight("Current filters:");
    for line in state.describe() {
        print_insight_level_2(&line);
    }
    println!();
}

pub fn render_time_stats(stats: &TimeStats) -> Vec<String> {
    let month = match &stats.month {
        Stat::Value(Counted { value, count }) => format!(
            "{} was the most common month with {} trips.",
            name_or_number(month_name(*value), *value),
            count
        ),
        Stat::NoData => format!("Most common month: {}.", NO_DATA),
    };
    let day = match &stats.day_of_week {
        Stat::Value(Counted { value, count }) => format!(
            "{} was the most common day with {} trips.",
            name_or_number(day_name(*value), *value),
            count
        ),
        Stat::NoData => format!("Most common day: {}.", NO_DATA),
    };
    let hour = match &stats.hour {
        Stat::Value(Counted { value, count }) => format!(
            "From {} was the most common hour with {} trips.",
            hour_window(*value),
            count
        ),
        Stat::NoData => format!("Most common hour: {}.", NO_DATA),
    };
    vec![month, day, hour]
}

pub fn render_station_stats(stats: &StationStats) -> Vec<String> {
    let start = match &stats.start_station {
        Stat::Value(Counted { value, count }) => format!(
            "{} was the most common start station with {} trips starting there.",
            value, count
        ),
        Stat::NoData => format!("Most common start station: {}.", NO_DATA),
    };
    let end = match &stats.end_station {
        Stat::Value(Counted { value, count }) => format!(
            "{} was the most common end station with {} trips ending there.",
            value, count
        ),
        Stat::NoData => format!("Most common end station: {}.", NO_DATA),
    };
    let trip = match &stats.trip {
        Stat::Value(Counted { value, count }) => format!(
            "The most common trip was {} with a total count of {}.",
            value, count
        ),
        Stat::NoData => format!("Most common trip: {}.", NO_DATA),
    };
    vec![start, end, trip]
}

pub fn render_duration_stats(stats: &Stat<DurationSummary>) -> Vec<String> {
    match stats {
        Stat::Value(summary) => vec![
            format!("The total travel time in seconds was {}.", summary.total),
            format!("The mean travel time in seconds was {:.2}.", summary.mean),
        ],
        Stat::NoData => vec![format!("Travel time: {}.", NO_DATA)],
    }
}

fn render_counts(title: &str, counts: &Stat<Vec<Counted<String>>>) -> Vec<String> {
    match counts {
        Stat::Value(counts) => {
            let mut lines = vec![format!("Counts of {}:", title)];
            lines.extend(
                counts
                    .iter()
                    .map(|counted| format!("  {:<12} {}", counted.value, counted.count)),
            );
            lines
        }
        Stat::NoData => vec![format!("Counts of {}: {}.", title, NO_DATA)],
    }
}

pub fn render_user_stats(stats: &UserStats) -> Vec<String> {
    let mut lines = render_counts("user types", &stats.user_types);
    lines.extend(render_counts("gender", &stats.genders));
    match &stats.birth_years {
        Stat::Value(years) => {
            lines.push(format!("The earliest year of birth was {}.", years.earliest));
            lines.push(format!("The most recent year of birth was {}.", years.latest));
            lines.push(format!(
                "The most common year of birth was {} ({} trips).",
                years.most_common.value, years.most_common.count
            ));
        }
        Stat::NoData => lines.push(format!("Year of birth: {}.", NO_DATA)),
    }
    lines
}

fn report(title: &str, render: impl FnOnce() -> Vec<String>) {
    print_insight(title);
    let started = Instant::now();
    let lines = render();
    let elapsed = started.elapsed();
    for line in lines {
        print_insight_level_2(&line);
    }
    println!();
    print_insight_level_2(&format!("This took {:.4} seconds.", elapsed.as_secs_f64()));
    divider();
}

/// Computes and prints the four statistic blocks, timing each one.
pub fn report_all(view: &FilteredView<'_>) {
    print_insight(&format!("{} trips match your filters.", view.len()));
    report("Calculating The Most Frequent Times of Travel...", || {
        render_time_stats(&time_stats(view))
    });
    report("Calculating The Most Popular Stations and Trip...", || {
        render_station_stats(&station_stats(view))
    });
    report("Calculating Trip Duration...", || {
        render_duration_stats(&duration_stats(view))
    });
    report("Calculating User Stats...", || {
        render_user_stats(&user_stats(view))
    });
}

pub fn render_raw_row(index: usize, trip: &TripRecord) -> Vec<String> {
    let mut lines = vec![
        format!("Index:         {}", index),
        format!("Start Station: {}", trip.start_station),
        format!("End Station:   {}", trip.end_station),
        format!("City:          {}", capitalize(&trip.city)),
        format!("Start Time:    {}", trip.start_time.format("%Y-%m-%d %H:%M:%S")),
        format!("End Time:      {}", trip.end_time),
        format!(
            "Trip Duration: {}",
            trip.trip_duration
                .map(|duration| duration.to_string())
                .unwrap_or_else(|| NO_DATA.to_string())
        ),
        format!(
            "User Type:     {}",
            trip.user_type.as_deref().unwrap_or(NO_DATA)
        ),
    ];
    if let Some(gender) = &trip.gender {
        lines.push(format!("Gender:        {}", gender));
    }
    if let Some(year) = trip.birth_year {
        lines.push(format!("Birth Year:    {}", year));
    }
    lines
}

pub fn print_raw_sample<R: Rng + ?Sized>(view: &FilteredView<'_>, amount: usize, rng: &mut R) {
    let sample = view.sample(amount, rng);
    if sample.is_empty() {
        print_insight("No trips to show, bro.");
        return;
    }
    for (index, trip) in sample {
        println!();
        for line in render_raw_row(index, trip) {
            print_insight_level_2(&line);
        }
    }
    println!();
}
