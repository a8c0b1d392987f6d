//! The last-completed-date ledger marker.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use rf_core::{format_stamp, parse_stamp};

use crate::atomic::write_atomic;
use crate::{RecordsError, RecordsResult};

/// Marker file name inside the ledger directory.
pub const LEDGER_FILE: &str = "last_simulation_date.txt";

/// The single persisted checkpoint gating the next simulation window.
///
/// Read once at the start of a cycle, written at most once at its end, and
/// only after every region confirmed completion. Single-controller model:
/// no locking against concurrent writers.
#[derive(Debug, Clone)]
pub struct DateLedger {
    path: PathBuf,
}

impl DateLedger {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(LEDGER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last globally-confirmed simulation end date.
    pub fn read(&self) -> RecordsResult<NaiveDate> {
        let missing = || RecordsError::LedgerMissing {
            path: self.path.clone(),
        };
        let raw = fs::read_to_string(&self.path).map_err(|_| missing())?;
        parse_stamp(raw.trim()).map_err(|_| missing())
    }

    /// Replace the marker. Callers must pass a date strictly later than the
    /// one read in the same cycle; the controller enforces this.
    pub fn write(&self, date: NaiveDate) -> RecordsResult<()> {
        let stamp = format_stamp(date);
        write_atomic(&self.path, format!("{stamp}\n").as_bytes())?;
        info!(stamp, path = %self.path.display(), "ledger advanced");
        Ok(())
    }
}
