//! Error type for the workflow service layer.
//!
//! Only cycle-fatal conditions surface here (ledger, layout, report
//! persistence); per-region errors are captured into that region's
//! terminal state instead, so they can never abort a sibling region.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Records error: {0}")]
    Records(String),

    #[error("Basin error: {0}")]
    Basin(String),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl From<rf_records::RecordsError> for WorkflowError {
    fn from(err: rf_records::RecordsError) -> Self {
        WorkflowError::Records(err.to_string())
    }
}

impl From<rf_basin::BasinError> for WorkflowError {
    fn from(err: rf_basin::BasinError) -> Self {
        WorkflowError::Basin(err.to_string())
    }
}
