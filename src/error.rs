// Library error type
//
// Lookups that miss are not errors (they return `None`); this enum covers
// the things around the engine that can genuinely fail: bad input values,
// report validation, storage and file I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("invalid report: {0}")]
    InvalidReport(String),

    #[error("report not found: {0}")]
    ReportNotFound(String),

    #[error("visualization not found: {0}")]
    VisualizationNotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InsightsError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        InsightsError::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}

pub type Result<T, E = InsightsError> = std::result::Result<T, E>;
