// trip_loader.rs
use crate::config::BroConfig;
use crate::error::{BroError, Result};
use crate::selection_set::{normalize, SelectionSet};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, info};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [
    START_TIME,
    END_TIME,
    START_STATION,
    END_STATION,
    TRIP_DURATION,
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One source row, column name to raw text. Missing columns have no key.
pub type RawRow = HashMap<String, String>;

/// Where per-city rows come from. The loader does not care about the format.
pub trait RecordSource {
    fn read_city(&self, city: &str) -> Result<Vec<RawRow>>;
}

/// Reads `<data_dir>/<file>` for each configured city.
pub struct CsvRecordSource {
    data_dir: PathBuf,
    files: HashMap<String, String>,
}

impl CsvRecordSource {
    pub fn new(data_dir: impl Into<PathBuf>, files: HashMap<String, String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            files,
        }
    }

    pub fn from_config(config: &BroConfig) -> Self {
        let files = config
            .cities
            .iter()
            .map(|city| (normalize(&city.name), city.file.clone()))
            .collect();
        Self::new(config.data_dir.clone(), files)
    }
}

impl RecordSource for CsvRecordSource {
    fn read_city(&self, city: &str) -> Result<Vec<RawRow>> {
        let file_name = self
            .files
            .get(city)
            .ok_or_else(|| BroError::UnknownCity(city.to_string()))?;
        let path = self.data_dir.join(file_name);
        debug!(city, path = %path.display(), "reading city file");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(File::open(&path)?);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: RawRow = headers
                .iter()
                .zip(record.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, value)| (header.clone(), value.to_string()))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

/// A normalized trip with its derived time attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: String,
    pub start_station: String,
    pub end_station: String,
    pub trip_duration: Option<f64>,
    pub city: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    /// 1 to 12
    pub month: u32,
    /// 0 is Sunday, 6 is Saturday
    pub day_of_week: u32,
    pub hour: u32,
}

/// Trips of all loaded cities, city by city in universe order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<TripRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

fn present(row: &RawRow, column: &str) -> Option<String> {
    row.get(column)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(String::from)
}

// Birth years arrive as "1992.0" in some files.
fn parse_year(value: &str) -> Option<i32> {
    let year = value.parse::<f64>().ok()?;
    if year.is_finite() && year.fract() == 0.0 {
        Some(year as i32)
    } else {
        None
    }
}

fn to_trip(city: &str, index: usize, row: &RawRow) -> Result<TripRecord> {
    for column in REQUIRED_COLUMNS {
        if !row.contains_key(column) {
            return Err(BroError::MissingColumn {
                city: city.to_string(),
                column: column.to_string(),
            });
        }
    }

    let raw_start = row.get(START_TIME).cloned().unwrap_or_default();
    let start_time = parse_timestamp(&raw_start).ok_or_else(|| BroError::InvalidTimestamp {
        city: city.to_string(),
        // header is line 1
        row: index + 2,
        value: raw_start.clone(),
    })?;

    Ok(TripRecord {
        start_time,
        end_time: present(row, END_TIME).unwrap_or_default(),
        start_station: present(row, START_STATION).unwrap_or_default(),
        end_station: present(row, END_STATION).unwrap_or_default(),
        trip_duration: present(row, TRIP_DURATION)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| value.is_finite()),
        city: city.to_string(),
        user_type: present(row, USER_TYPE),
        gender: present(row, GENDER),
        birth_year: present(row, BIRTH_YEAR).and_then(|value| parse_year(&value)),
        month: start_time.month(),
        day_of_week: start_time.weekday().num_days_from_sunday(),
        hour: start_time.hour(),
    })
}

/// Loads every selected city, in universe order, into one dataset.
pub fn load_dataset(source: &dyn RecordSource, cities: &SelectionSet) -> Result<Dataset> {
    let selected = cities.members();
    if selected.is_empty() {
        return Err(BroError::NoCitiesSelected);
    }

    let mut dataset = Dataset::default();
    for city in selected {
        let rows = source.read_city(city)?;
        let before = dataset.len();
        for (index, row) in rows.iter().enumerate() {
            dataset.records.push(to_trip(city, index, row)?);
        }
        info!(city, rows = dataset.len() - before, "loaded city");
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection_editor::SelectionEdit;
    use crate::selection_set::DEFAULT_CITIES;

    #[derive(Default)]
    struct MemorySource {
        cities: HashMap<String, Vec<RawRow>>,
    }

    impl RecordSource for MemorySource {
        fn read_city(&self, city: &str) -> Result<Vec<RawRow>> {
            self.cities
                .get(city)
                .cloned()
                .ok_or_else(|| BroError::UnknownCity(city.to_string()))
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn trip_row(start: &str, from: &str, to: &str, duration: &str) -> RawRow {
        raw(&[
            (START_TIME, start),
            (END_TIME, start),
            (START_STATION, from),
            (END_STATION, to),
            (TRIP_DURATION, duration),
            (USER_TYPE, "Subscriber"),
        ])
    }

    fn source() -> MemorySource {
        let mut chicago = trip_row("2017-01-01 09:07:57", "Canal St", "Clark St", "776");
        chicago.insert(GENDER.to_string(), "Male".to_string());
        chicago.insert(BIRTH_YEAR.to_string(), "1992.0".to_string());

        let mut source = MemorySource::default();
        source.cities.insert("chicago".into(), vec![chicago]);
        source.cities.insert(
            "washington".into(),
            vec![
                trip_row("2017-06-21 08:36:34", "14th St", "M St", "1321.5"),
                trip_row("2017-03-11 10:01:00", "M St", "14th St", ""),
            ],
        );
        source.cities.insert("new york city".into(), Vec::new());
        source
    }

    #[test]
    fn loads_in_universe_order_with_derived_fields() {
        let cities = SelectionSet::cities(DEFAULT_CITIES).unwrap();
        let dataset = load_dataset(&source(), &cities).unwrap();
        assert_eq!(dataset.len(), 3);

        let first = &dataset.records[0];
        assert_eq!(first.city, "chicago");
        assert_eq!(first.month, 1);
        // 2017-01-01 was a Sunday
        assert_eq!(first.day_of_week, 0);
        assert_eq!(first.hour, 9);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));

        let second = &dataset.records[1];
        assert_eq!(second.city, "washington");
        assert_eq!(second.month, 6);
        // Wednesday
        assert_eq!(second.day_of_week, 3);
        assert_eq!(second.trip_duration, Some(1321.5));
        assert_eq!(second.gender, None);
        assert_eq!(second.birth_year, None);

        assert_eq!(dataset.records[2].trip_duration, None);
    }

    #[test]
    fn skips_unselected_cities() {
        let cities = SelectionEdit::SelectOnly("washington".into())
            .apply(&SelectionSet::cities(DEFAULT_CITIES).unwrap())
            .unwrap();
        let dataset = load_dataset(&source(), &cities).unwrap();
        assert!(dataset.records.iter().all(|trip| trip.city == "washington"));
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn refuses_when_no_city_selected() {
        let mut cities = SelectionSet::cities(DEFAULT_CITIES).unwrap();
        cities.set_all(false);
        let err = load_dataset(&source(), &cities).unwrap_err();
        assert!(matches!(err, BroError::NoCitiesSelected));
    }

    #[test]
    fn reports_bad_timestamps_and_missing_columns() {
        let mut source = MemorySource::default();
        source.cities.insert(
            "chicago".into(),
            vec![trip_row("yesterday-ish", "A", "B", "10")],
        );
        let cities = SelectionSet::cities(["chicago"]).unwrap();
        let err = load_dataset(&source, &cities).unwrap_err();
        assert!(matches!(err, BroError::InvalidTimestamp { row: 2, .. }));

        source.cities.insert(
            "chicago".into(),
            vec![raw(&[(START_TIME, "2017-01-01 00:00:00")])],
        );
        let err = load_dataset(&source, &cities).unwrap_err();
        assert!(matches!(err, BroError::MissingColumn { .. }));
    }

    #[test]
    fn padded_config_names_find_their_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("chicago.csv"),
            "Start Time,End Time,Trip Duration,Start Station,End Station\n\
             2017-01-01 09:07:57,2017-01-01 09:20:53,776,Canal St,Clark St\n",
        )
        .unwrap();
        let config = BroConfig {
            data_dir: dir.path().to_path_buf(),
            cities: vec![crate::config::CityFile {
                name: " Chicago ".into(),
                file: "chicago.csv".into(),
            }],
            sample_size: 5,
        };

        let cities = SelectionSet::cities(config.city_names()).unwrap();
        let source = CsvRecordSource::from_config(&config);
        let dataset = load_dataset(&source, &cities).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].city, "chicago");
    }

    #[test]
    fn timestamp_parsing_accepts_fractional_seconds() {
        assert!(parse_timestamp("2017-05-01 12:00:00").is_some());
        assert!(parse_timestamp("2017-05-01 12:00:00.250").is_some());
        assert!(parse_timestamp("05/01/2017").is_none());
    }

    #[test]
    fn birth_years_must_be_whole() {
        assert_eq!(parse_year("1985"), Some(1985));
        assert_eq!(parse_year("1985.0"), Some(1985));
        assert_eq!(parse_year("1985.5"), None);
        assert_eq!(parse_year("unknown"), None);
    }
}
