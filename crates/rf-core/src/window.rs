//! Simulation windows and the filename date-range codec.
//!
//! Initial-condition files and solver output artifacts both embed their
//! covered range as `<prefix>YYYYMMDDtoYYYYMMDD<suffix>`; this module is
//! the single place that encoding rule lives.

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, CoreResult};
use crate::stamp::{format_stamp, parse_stamp, STAMP_LEN};

const RANGE_SEPARATOR: &str = "to";
const TOKEN_LEN: usize = STAMP_LEN + RANGE_SEPARATOR.len() + STAMP_LEN;

/// Inclusive `[start, end]` calendar window bounding one simulation run.
///
/// `end < start` is representable on purpose: the output-window resolver
/// needs to see a regressed window to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `YYYYMMDDtoYYYYMMDD` token.
    pub fn token(&self) -> String {
        format!(
            "{}{}{}",
            format_stamp(self.start),
            RANGE_SEPARATOR,
            format_stamp(self.end)
        )
    }

    /// Parse a `YYYYMMDDtoYYYYMMDD` token.
    pub fn parse_token(raw: &str) -> CoreResult<Self> {
        let bad = || CoreError::InvalidWindowToken {
            raw: raw.to_string(),
        };
        if raw.len() != TOKEN_LEN || !raw.is_ascii() {
            return Err(bad());
        }
        let (start_raw, rest) = raw.split_at(STAMP_LEN);
        let (sep, end_raw) = rest.split_at(RANGE_SEPARATOR.len());
        if sep != RANGE_SEPARATOR {
            return Err(bad());
        }
        let start = parse_stamp(start_raw).map_err(|_| bad())?;
        let end = parse_stamp(end_raw).map_err(|_| bad())?;
        Ok(Self { start, end })
    }

    /// Decode a window from a file name of the form `<prefix><token><suffix>`.
    ///
    /// Returns `None` for names that do not match the pattern; directory
    /// scans treat those as non-candidates rather than errors.
    pub fn from_file_name(name: &str, prefix: &str, suffix: &str) -> Option<Self> {
        let token = name.strip_prefix(prefix)?.strip_suffix(suffix)?;
        Self::parse_token(token).ok()
    }

    /// Encode this window as `<prefix><token><suffix>`.
    pub fn file_name(&self, prefix: &str, suffix: &str) -> String {
        format!("{prefix}{}{suffix}", self.token())
    }

    /// Number of calendar days covered (inclusive).
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether the window runs forward in time.
    pub fn is_forward(&self) -> bool {
        self.end >= self.start
    }

    /// Calendar year containing the end date.
    pub fn year_of_end(&self) -> i32 {
        self.end.year()
    }
}
