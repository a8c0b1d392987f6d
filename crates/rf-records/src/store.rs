//! Year-partitioned record store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use rf_core::{format_stamp, next_day, DateWindow};

use crate::series::FlowSeries;
use crate::{RecordsError, RecordsResult};

pub const RECORD_PREFIX: &str = "qout_record_";

/// Durable per-region-per-year discharge records under one root directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

/// What a merge did to the target record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First output touching this region-year; the record was seeded from
    /// the whole artifact.
    Created { path: PathBuf, rows: usize },
    /// The artifact was appended after the record's last row.
    Appended { path: PathBuf, rows: usize },
}

impl RecordStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn region_dir(&self, region: &str) -> PathBuf {
        self.root.join(region)
    }

    pub fn record_path(&self, region: &str, year: i32) -> PathBuf {
        self.region_dir(region)
            .join(format!("{RECORD_PREFIX}{year}.csv"))
    }

    /// Merge one solver artifact into the record of the year containing the
    /// achieved end date.
    ///
    /// A rollover artifact is merged whole into the new year's record, so a
    /// window like `20181225to20190105` seeds the 2019 record starting at
    /// 20181225. Gap or overlap against an existing record fails without
    /// touching the file.
    pub fn merge(
        &self,
        region: &str,
        artifact: &Path,
        window: DateWindow,
    ) -> RecordsResult<MergeOutcome> {
        let addition = FlowSeries::read_csv(artifact)?;
        if addition.first_date() != window.start || addition.last_date() != window.end {
            warn!(
                artifact = %artifact.display(),
                rows = %format!(
                    "{}..{}",
                    format_stamp(addition.first_date()),
                    format_stamp(addition.last_date())
                ),
                window = %window.token(),
                "artifact rows do not span the window its name claims"
            );
        }

        let path = self.record_path(region, window.year_of_end());
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let rows = addition.len();
            addition.write_csv(&path)?;
            info!(region, year = window.year_of_end(), path = %path.display(), "record created");
            return Ok(MergeOutcome::Created { path, rows });
        }

        let mut record = FlowSeries::read_csv(&path)?;
        if record.width() != addition.width() {
            return Err(RecordsError::SeriesShapeMismatch {
                expected: record.width(),
                found: addition.width(),
            });
        }
        let expected_start = next_day(record.last_date());
        if addition.first_date() != expected_start {
            return Err(RecordsError::RecordDiscontinuity {
                record_last: format_stamp(record.last_date()),
                addition_first: format_stamp(addition.first_date()),
            });
        }

        let rows = addition.len();
        record.append(addition);
        record.write_csv(&path)?;
        info!(region, rows, path = %path.display(), "record extended");
        Ok(MergeOutcome::Appended { path, rows })
    }
}
