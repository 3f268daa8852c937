pub mod comparison;
pub mod engagement;
pub mod error;
pub mod export;
pub mod filter;
pub mod leaderboard;
pub mod loader;
pub mod models;
pub mod overview;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod stats;
pub mod store;
pub mod table;
pub mod thresholds;
pub mod trend;

pub use error::{InsightsError, Result};
pub use filter::{apply_filters, ComparisonField, Filters, TimePeriod};
pub use models::{CourseType, TrainingRecord};
pub use pipeline::{Dashboard, DashboardSnapshot};
pub use store::RecordStore;
pub use table::{SortDirection, TableRow, TableView};
pub use thresholds::Thresholds;
