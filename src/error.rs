//! Error types for circadia

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while loading nights or computing metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("No night record for {0}")]
    NotFound(NaiveDate),

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("No environment reading for {0}")]
    EnvironmentUnavailable(NaiveDate),

    #[error("Metric not yet specified: {0}")]
    NotSpecified(&'static str),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),
}
