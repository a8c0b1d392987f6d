//! `YYYYMMDD` date stamps.
//!
//! Every date that crosses a file boundary (ledger marker, file names,
//! record rows) uses this one textual form.

use chrono::{Days, NaiveDate};

use crate::error::{CoreError, CoreResult};

/// Byte length of a stamp (`YYYYMMDD`).
pub const STAMP_LEN: usize = 8;

const STAMP_FORMAT: &str = "%Y%m%d";

/// Parse a `YYYYMMDD` stamp into a calendar date.
pub fn parse_stamp(raw: &str) -> CoreResult<NaiveDate> {
    if raw.len() != STAMP_LEN {
        return Err(CoreError::InvalidStamp {
            raw: raw.to_string(),
        });
    }
    NaiveDate::parse_from_str(raw, STAMP_FORMAT).map_err(|_| CoreError::InvalidStamp {
        raw: raw.to_string(),
    })
}

/// Format a calendar date as `YYYYMMDD`.
pub fn format_stamp(date: NaiveDate) -> String {
    date.format(STAMP_FORMAT).to_string()
}

/// The day after `date`.
pub fn next_day(date: NaiveDate) -> NaiveDate {
    // only fails at NaiveDate::MAX, far outside any simulation calendar
    date.succ_opt().expect("date overflow")
}

/// `date` plus `n` days.
pub fn add_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).expect("date overflow")
}
