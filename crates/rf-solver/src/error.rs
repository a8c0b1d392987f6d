use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Failed to launch solver for {region}: {source}")]
    Launch {
        region: String,
        source: std::io::Error,
    },

    #[error("Solver run failed for {region}: {status}")]
    InvocationFailed { region: String, status: ExitStatus },

    #[error("Solver run for {region} exceeded {seconds}s and was killed")]
    TimedOut { region: String, seconds: u64 },

    #[error("No output artifact starting {stamp} in {dir}")]
    ArtifactMissing { dir: PathBuf, stamp: String },

    #[error("Output artifact name does not encode a date range: {path}")]
    UnparsableOutputWindow { path: PathBuf },

    #[error("Output window runs backwards: {start} to {end}")]
    WindowRegression { start: String, end: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
