//! Gridded runoff forcing catalog.
//!
//! The source directory holds one file per day, `runoff_<YYYYMMDD>.<ext>`.
//! The latest date present bounds how far any simulation window may reach.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use rf_core::parse_stamp;

use crate::error::{BasinError, BasinResult};

pub const RUNOFF_PREFIX: &str = "runoff_";

/// Dates for which gridded runoff forcing exists, sorted ascending.
#[derive(Debug, Clone)]
pub struct RunoffCatalog {
    dates: Vec<NaiveDate>,
}

impl RunoffCatalog {
    /// Scan a forcing directory. Files not matching the naming scheme are
    /// ignored; extensions are not interpreted.
    pub fn scan(dir: &Path) -> BasinResult<Self> {
        if !dir.is_dir() {
            return Err(BasinError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        let mut dates = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let stamp = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.strip_prefix(RUNOFF_PREFIX));
            match stamp.and_then(|s| parse_stamp(s).ok()) {
                Some(date) => dates.push(date),
                None => debug!(path = %path.display(), "not a runoff file"),
            }
        }
        dates.sort_unstable();
        dates.dedup();
        Ok(Self { dates })
    }

    /// Latest date any simulation may be driven to; `None` for an empty
    /// catalog.
    pub fn latest(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }
}
