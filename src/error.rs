use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for AnalyticsError {
    fn from(err: polars::error::PolarsError) -> Self {
        AnalyticsError::Polars(err.to_string())
    }
}

impl From<csv::Error> for AnalyticsError {
    fn from(err: csv::Error) -> Self {
        AnalyticsError::Load(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
