use bikebro::config::{load_config, BroConfig, CityFile};
use bikebro::trip_stats::{Counted, Stat};
use bikebro::{
    filter_dataset, load_dataset, summarize, BroError, Category, CsvRecordSource, FilterState,
    SelectionEdit,
};
use std::fs;
use tempfile::TempDir;

const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-01 09:07:57,2017-01-01 09:20:53,776,Canal St & Adams St,Clark St & Lake St,Subscriber,Male,1992.0
2,2017-01-02 17:05:11,2017-01-02 17:16:42,691,Canal St & Adams St,Clark St & Lake St,Subscriber,Female,1985.0
3,2017-02-03 08:01:00,2017-02-03 08:11:00,600,Wells St & Elm St,Canal St & Adams St,Customer,,
";

const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1,2017-01-04 10:00:00,2017-01-04 10:30:00,1800.5,Canal St & Adams St,14th & V St NW,Subscriber
2,2017-01-05 10:15:00,2017-01-05 10:25:00,600.0,14th & V St NW,M St & New Jersey Ave SE,Customer
";

fn setup() -> (TempDir, BroConfig) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("chicago.csv"), CHICAGO).unwrap();
    fs::write(dir.path().join("washington.csv"), WASHINGTON).unwrap();
    let config = BroConfig {
        data_dir: dir.path().to_path_buf(),
        cities: vec![
            CityFile {
                name: "chicago".into(),
                file: "chicago.csv".into(),
            },
            CityFile {
                name: "washington".into(),
                file: "washington.csv".into(),
            },
        ],
        sample_size: 5,
    };
    (dir, config)
}

#[test]
fn unfiltered_run_covers_every_city() {
    let (_dir, config) = setup();
    let filters = FilterState::new(config.city_names()).unwrap();
    let source = CsvRecordSource::from_config(&config);

    let dataset = load_dataset(&source, filters.cities()).unwrap();
    assert_eq!(dataset.len(), 5);
    let cities: Vec<&str> = dataset.records.iter().map(|trip| trip.city.as_str()).collect();
    assert_eq!(
        cities,
        vec!["chicago", "chicago", "chicago", "washington", "washington"]
    );

    let view = filter_dataset(&dataset, filters.months(), filters.days());
    assert_eq!(view.len(), dataset.len());

    let summary = summarize(&view);
    assert_eq!(summary.time.month, Stat::Value(Counted { value: 1, count: 4 }));

    // the same station name in two cities is two different stations
    let start = summary.stations.start_station.value().unwrap();
    assert_eq!(start.value.city, "chicago");
    assert_eq!(start.count, 2);

    let durations = summary.durations.value().unwrap();
    assert_eq!(durations.trips, 5);
    assert_eq!(durations.total, 776.0 + 691.0 + 600.0 + 1800.5 + 600.0);

    // gender is only known for two chicago trips
    let genders = summary.users.genders.value().unwrap();
    assert_eq!(genders.iter().map(|c| c.count).sum::<usize>(), 2);
}

#[test]
fn washington_alone_has_no_gender_or_birth_year() {
    let (_dir, config) = setup();
    let mut filters = FilterState::new(config.city_names()).unwrap();
    filters
        .apply(
            Category::Cities,
            &SelectionEdit::parse("select only Washington").unwrap(),
        )
        .unwrap();

    let source = CsvRecordSource::from_config(&config);
    let dataset = load_dataset(&source, filters.cities()).unwrap();
    let view = filter_dataset(&dataset, filters.months(), filters.days());
    let summary = summarize(&view);

    assert_eq!(view.len(), 2);
    assert_eq!(summary.users.genders, Stat::NoData);
    assert_eq!(summary.users.birth_years, Stat::NoData);
    let user_types = summary.users.user_types.value().unwrap();
    assert_eq!(user_types.len(), 2);
}

#[test]
fn day_and_month_filters_narrow_the_view() {
    let (_dir, config) = setup();
    let mut filters = FilterState::new(config.city_names()).unwrap();
    filters
        .apply(Category::Months, &SelectionEdit::parse("f january").unwrap())
        .unwrap();
    // 2017-01-02 was a Monday
    filters
        .apply(Category::Days, &SelectionEdit::parse("select only monday").unwrap())
        .unwrap();

    let source = CsvRecordSource::from_config(&config);
    let dataset = load_dataset(&source, filters.cities()).unwrap();
    let view = filter_dataset(&dataset, filters.months(), filters.days());
    assert_eq!(view.indices(), &[1]);

    filters
        .apply(Category::Days, &SelectionEdit::parse("add saturday").unwrap())
        .unwrap();
    let wider = filter_dataset(&dataset, filters.months(), filters.days());
    assert!(wider.len() >= view.len());
}

#[test]
fn empty_view_reports_no_data_everywhere() {
    let (_dir, config) = setup();
    let mut filters = FilterState::new(config.city_names()).unwrap();
    filters
        .apply(Category::Months, &SelectionEdit::parse("select only december").unwrap())
        .unwrap();

    let source = CsvRecordSource::from_config(&config);
    let dataset = load_dataset(&source, filters.cities()).unwrap();
    let view = filter_dataset(&dataset, filters.months(), filters.days());
    assert!(view.is_empty());

    let summary = summarize(&view);
    assert!(summary.time.month.is_no_data());
    assert!(summary.time.day_of_week.is_no_data());
    assert!(summary.time.hour.is_no_data());
    assert!(summary.stations.start_station.is_no_data());
    assert!(summary.stations.end_station.is_no_data());
    assert!(summary.stations.trip.is_no_data());
    assert!(summary.durations.is_no_data());
    assert!(summary.users.user_types.is_no_data());
    assert!(summary.users.genders.is_no_data());
    assert!(summary.users.birth_years.is_no_data());
}

#[test]
fn missing_city_file_fails_the_run() {
    let (dir, config) = setup();
    fs::remove_file(dir.path().join("washington.csv")).unwrap();
    let filters = FilterState::new(config.city_names()).unwrap();
    let source = CsvRecordSource::from_config(&config);
    let err = load_dataset(&source, filters.cities()).unwrap_err();
    assert!(matches!(err, BroError::Io(_)));
}

#[test]
fn default_config_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bro.config");
    let config = load_config(&path).unwrap();
    let filters = FilterState::new(config.city_names()).unwrap();
    assert_eq!(
        filters.cities().universe().collect::<Vec<_>>(),
        vec!["chicago", "new york city", "washington"]
    );
}
