pub mod config;
pub mod error;
pub mod selection_editor;
pub mod selection_set;
pub mod trip_filter;
pub mod trip_loader;
pub mod trip_presenter;
pub mod trip_stats;
pub mod user_experience;
pub mod user_interaction;

pub use error::{BroError, Result};
pub use selection_editor::{FilterState, SelectionEdit};
pub use selection_set::{Category, SelectionSet};
pub use trip_filter::{filter_dataset, FilteredView};
pub use trip_loader::{load_dataset, CsvRecordSource, Dataset, RecordSource, TripRecord};
pub use trip_stats::{summarize, Stat, TripSummary};
