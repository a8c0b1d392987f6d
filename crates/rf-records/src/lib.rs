//! rf-records: durable workflow state.
//!
//! Two kinds of state survive between cycles: the single last-completed-date
//! ledger marker, and one append-only discharge record per region per year.
//! Every mutation here goes through write-to-temp-then-rename so a crash
//! mid-write can never leave a half-written file looking complete.

mod atomic;
pub mod ledger;
pub mod series;
pub mod store;

pub use ledger::DateLedger;
pub use series::FlowSeries;
pub use store::{MergeOutcome, RecordStore};

use std::path::PathBuf;

pub type RecordsResult<T> = Result<T, RecordsError>;

#[derive(thiserror::Error, Debug)]
pub enum RecordsError {
    #[error("Ledger marker missing or unreadable: {path}")]
    LedgerMissing { path: PathBuf },

    #[error("Record discontinuity: record ends {record_last}, addition starts {addition_first}")]
    RecordDiscontinuity {
        record_last: String,
        addition_first: String,
    },

    #[error("Series value-column mismatch: expected {expected}, found {found}")]
    SeriesShapeMismatch { expected: usize, found: usize },

    #[error("Empty time series: {path}")]
    EmptySeries { path: PathBuf },

    #[error("Bad series row in {path}: {what}")]
    BadSeriesRow { path: PathBuf, what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
