// error.rs
use thiserror::Error;

/// Everything that can go wrong between picking filters and printing stats.
#[derive(Error, Debug)]
pub enum BroError {
    #[error("'{value}' is not a valid {category}. Possible inputs are: {}", .universe.join(", "))]
    UnknownValue {
        category: String,
        value: String,
        universe: Vec<String>,
    },

    #[error("'{value}' is not part of the {category} universe")]
    InvalidValue { category: String, value: String },

    #[error("Cannot omit '{value}', it is the last {category} in the filter")]
    WouldEmptySelection { category: String, value: String },

    #[error("A {0} selection needs at least one value to choose from")]
    EmptyUniverse(String),

    #[error("No cities selected, nothing to load")]
    NoCitiesSelected,

    #[error("Could not make sense of '{0}'")]
    UnknownCommand(String),

    #[error("Data for {city} has no '{column}' column")]
    MissingColumn { city: String, column: String },

    #[error("Row {row} of {city} has an unreadable start time '{value}'")]
    InvalidTimestamp {
        city: String,
        row: usize,
        value: String,
    },

    #[error("No data file configured for {0}")]
    UnknownCity(String),

    #[error("Config problem: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BroError>;
