//! Locating and interpreting solver output artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use rf_core::{format_stamp, DateWindow};

use crate::error::{SolverError, SolverResult};

pub const QOUT_PREFIX: &str = "qout_";
pub const QOUT_SUFFIX: &str = ".csv";

/// Find the artifact produced for a window starting at `start`.
///
/// Artifacts are superseded, not deleted, so a retry that got further than
/// an earlier partial run can leave two files with the same start date; the
/// one reaching furthest is the current state of that region.
pub fn find_artifact(output_dir: &Path, start: NaiveDate) -> SolverResult<PathBuf> {
    let mut matches: Vec<(DateWindow, PathBuf)> = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(window) = DateWindow::from_file_name(name, QOUT_PREFIX, QOUT_SUFFIX) {
            if window.start == start {
                matches.push((window, entry.path()));
            }
        }
    }
    if matches.len() > 1 {
        warn!(
            dir = %output_dir.display(),
            count = matches.len(),
            "multiple artifacts share a start date, taking the furthest"
        );
    }
    matches
        .into_iter()
        .max_by_key(|(window, _)| window.end)
        .map(|(_, path)| path)
        .ok_or_else(|| SolverError::ArtifactMissing {
            dir: output_dir.to_path_buf(),
            stamp: format_stamp(start),
        })
}

/// Recover the window the solver actually computed from an artifact path.
///
/// The filename is authoritative. A window that runs backwards means the
/// solver made no forward progress; callers treat that as a no-op, not a
/// crash.
pub fn resolve_window(path: &Path) -> SolverResult<DateWindow> {
    let window = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| DateWindow::from_file_name(name, QOUT_PREFIX, QOUT_SUFFIX))
        .ok_or_else(|| SolverError::UnparsableOutputWindow {
            path: path.to_path_buf(),
        })?;
    if !window.is_forward() {
        return Err(SolverError::WindowRegression {
            start: format_stamp(window.start),
            end: format_stamp(window.end),
        });
    }
    Ok(window)
}
