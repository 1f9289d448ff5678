use anyhow::Context;
use bikebro::config::{load_config, BroConfig, DEFAULT_CONFIG_FILE};
use bikebro::trip_presenter::{print_current_filter, print_raw_sample, report_all};
use bikebro::user_experience::{handle_back_flag, handle_quit_flag, handle_special_flag};
use bikebro::user_interaction::{
    closest_match, get_user_input, get_user_input_level_2, is_yes, print_insight,
    print_insight_level_2, print_list_level_2,
};
use bikebro::{
    filter_dataset, load_dataset, BroError, Category, CsvRecordSource, FilterState, SelectionEdit,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::EnvFilter;

const BRO_VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() {
    let filter = EnvFilter::try_from_env("BIKEBRO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config_path_from_args() -> PathBuf {
    let args: Vec<String> = env::args().collect();
    if let Some(position) = args.iter().position(|arg| arg == "--config") {
        if let Some(path) = args.get(position + 1) {
            return PathBuf::from(path);
        }
    }
    env::var("BIKEBRO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

// A config edit can change the city list; old city selections then make no sense.
fn sync_city_universe(filters: &mut FilterState, config: &BroConfig) {
    let configured = config.city_names();
    let current: Vec<&str> = filters.cities().universe().collect();
    if current != configured {
        print_insight("City list changed, city filter reset to all.");
        if let Err(e) = filters.replace_city_universe(configured) {
            print_insight(&format!("Keeping the old city filter: {}", e));
        }
    }
}

fn report_edit_error(e: &BroError) {
    print_insight_level_2(&e.to_string());
    if let BroError::UnknownValue {
        value, universe, ..
    } = e
    {
        let options: Vec<&str> = universe.iter().map(String::as_str).collect();
        if let Some(guess) = closest_match(value, &options) {
            print_insight_level_2(&format!("Did you mean '{}'?", guess));
        }
    }
}

/// Returns false if the user backed out of filter editing altogether, or
/// input ran out.
fn change_category_filter(
    filters: &mut FilterState,
    category: Category,
    config_path: &Path,
    config: &mut BroConfig,
    ask: &mut dyn FnMut(&str) -> Option<String>,
) -> bool {
    let singular = category.singular();
    let commands = [
        format!("select all          : apply no {} filter", singular),
        format!("add <{}>          : add a {} to the filter", singular, singular),
        format!("remove <{}>       : omit a {} from the filter", singular, singular),
        format!("select only <{}>  : filter for one {} only", singular, singular),
    ];
    let commands: Vec<&str> = commands.iter().map(String::as_str).collect();

    loop {
        print_list_level_2(&commands);
        let Some(choice) = ask("Every other input leaves the filter unchanged: ") else {
            return false;
        };
        handle_quit_flag(&choice);
        if handle_back_flag(&choice) {
            return false;
        }
        if handle_special_flag(&choice, config_path, config) {
            sync_city_universe(filters, config);
            continue;
        }

        if !choice.trim().is_empty() {
            match SelectionEdit::parse(&choice) {
                Ok(edit) => {
                    if let Err(e) = filters.apply(category, &edit) {
                        report_edit_error(&e);
                    }
                }
                Err(e) => report_edit_error(&e),
            }
        }

        println!();
        print_current_filter(filters);
        let Some(done) = ask(&format!(
            "Enter yes if you are done changing the {} filter: ",
            singular
        )) else {
            return false;
        };
        handle_quit_flag(&done);
        if is_yes(&done) {
            return true;
        }
    }
}

fn change_filters(filters: &mut FilterState, config_path: &Path, config: &mut BroConfig) {
    for category in Category::ALL {
        print_insight(&format!("Changing the {} filter.", category.singular()));
        if !change_category_filter(
            filters,
            category,
            config_path,
            config,
            &mut get_user_input_level_2,
        ) {
            break;
        }
    }
    println!("{}", "-".repeat(40));
}

fn run_pipeline(filters: &FilterState, config: &BroConfig) -> bikebro::Result<()> {
    print_insight("Loading data and calculating statistics. Please wait.");
    let source = CsvRecordSource::from_config(config);
    let dataset = load_dataset(&source, filters.cities())?;
    let view = filter_dataset(&dataset, filters.months(), filters.days());
    report_all(&view);

    let mut rng = rand::thread_rng();
    loop {
        let Some(answer) =
            get_user_input("To display some raw data enter yes. Skip with any other input: ")
        else {
            break;
        };
        handle_quit_flag(&answer);
        if !is_yes(&answer) {
            break;
        }
        print_raw_sample(&view, config.sample_size, &mut rng);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    if env::args().any(|arg| arg == "--version") {
        print_insight(BRO_VERSION);
        std::process::exit(0);
    }

    init_logging();

    let config_path = config_path_from_args();
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let mut filters = FilterState::new(config.city_names())?;

    loop {
        print_insight("Hello! Let's explore some US bikeshare data!");
        println!();
        print_current_filter(&filters);

        let Some(choice) = get_user_input(
            "To change filters enter yes. Any other input leaves them unchanged: ",
        ) else {
            break;
        };
        handle_quit_flag(&choice);
        if handle_special_flag(&choice, &config_path, &mut config) {
            sync_city_universe(&mut filters, &config);
            continue;
        }
        if is_yes(&choice) {
            change_filters(&mut filters, &config_path, &mut config);
        }

        if let Err(e) = run_pipeline(&filters, &config) {
            error!(error = %e, "pipeline run failed");
            print_insight(&format!("Could not crunch the numbers: {}", e));
        }

        let restart =
            get_user_input("Would you like to continue exploring? To continue enter yes: ")
                .unwrap_or_default();
        handle_quit_flag(&restart);
        if !is_yes(&restart) {
            break;
        }
    }

    Ok(())
}
