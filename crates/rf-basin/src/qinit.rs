//! Initial-condition file selection.
//!
//! A completed solver run leaves behind `qinit_<start>to<end>.csv` holding
//! the routed-flow state at `end`. Old files are superseded, never deleted,
//! so a region directory accumulates one per past run and selection must be
//! by exact end date, never pick-first.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use rf_core::{format_stamp, DateWindow};

use crate::error::{BasinError, BasinResult};

pub const QINIT_PREFIX: &str = "qinit_";
pub const QINIT_SUFFIX: &str = ".csv";

/// A located initial-condition file and the range it encodes.
#[derive(Debug, Clone)]
pub struct InitialCondition {
    pub path: PathBuf,
    pub window: DateWindow,
}

fn scan_candidates(dir: &Path) -> BasinResult<Vec<InitialCondition>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        match DateWindow::from_file_name(name, QINIT_PREFIX, QINIT_SUFFIX) {
            Some(window) => candidates.push(InitialCondition {
                path: entry.path(),
                window,
            }),
            None => debug!(name, "not an initial-condition candidate"),
        }
    }
    Ok(candidates)
}

/// Select the unique initial condition whose end date equals `target`.
pub fn locate_initial_condition(dir: &Path, target: NaiveDate) -> BasinResult<InitialCondition> {
    let mut matches: Vec<InitialCondition> = scan_candidates(dir)?
        .into_iter()
        .filter(|c| c.window.end == target)
        .collect();
    match matches.len() {
        0 => Err(BasinError::NoMatchingInitialCondition {
            dir: dir.to_path_buf(),
            stamp: format_stamp(target),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(BasinError::AmbiguousInitialCondition {
            dir: dir.to_path_buf(),
            stamp: format_stamp(target),
            count,
        }),
    }
}

/// Find where this region should resume, given the global ledger date.
///
/// Normally the only candidate ending at or after the ledger date is the one
/// ending exactly on it. After a partially failed cycle a region that did
/// complete is ahead of the ledger; its resume point is its own latest end
/// date, not the stale global one, so retries never re-simulate and re-merge
/// data the region already holds.
pub fn resume_point(dir: &Path, ledger_date: NaiveDate) -> BasinResult<InitialCondition> {
    let target = scan_candidates(dir)?
        .iter()
        .map(|c| c.window.end)
        .filter(|end| *end >= ledger_date)
        .max()
        .ok_or_else(|| BasinError::NoMatchingInitialCondition {
            dir: dir.to_path_buf(),
            stamp: format_stamp(ledger_date),
        })?;
    locate_initial_condition(dir, target)
}
