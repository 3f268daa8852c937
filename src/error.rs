use thiserror::Error;

/// Errors raised at the fallible edges of the crate: loading, configuration,
/// table state and export. Aggregations themselves never fail.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("threshold {name} must be a finite value between 0 and 100, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("duplicate record id {0}")]
    DuplicateRecordId(u32),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("rows per page must be at least 1")]
    InvalidPageSize,
}

pub type Result<T> = std::result::Result<T, InsightsError>;
