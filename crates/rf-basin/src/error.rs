use std::path::PathBuf;

use thiserror::Error;

pub type BasinResult<T> = Result<T, BasinError>;

#[derive(Error, Debug)]
pub enum BasinError {
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("No region sub-directories under {path}")]
    NoRegions { path: PathBuf },

    #[error("Missing weight table: {path}")]
    MissingWeightTable { path: PathBuf },

    #[error("No initial condition ending {stamp} in {dir}")]
    NoMatchingInitialCondition { dir: PathBuf, stamp: String },

    #[error("{count} initial conditions ending {stamp} in {dir}")]
    AmbiguousInitialCondition {
        dir: PathBuf,
        stamp: String,
        count: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
