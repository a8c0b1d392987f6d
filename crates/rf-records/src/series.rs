//! Daily discharge series rows.
//!
//! Record files and solver artifacts share one row format: a `YYYYMMDD`
//! stamp followed by one discharge value per river reach, no header. Rows
//! are daily and contiguous; both properties are checked at read time so a
//! corrupt file is rejected before it can contaminate a record.

use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};

use rf_core::{format_stamp, next_day, parse_stamp};

use crate::atomic::write_atomic;
use crate::{RecordsError, RecordsResult};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

/// A non-empty run of contiguous daily rows.
///
/// Only constructed by reading a file, so the non-empty and contiguity
/// invariants hold for every live value.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSeries {
    rows: Vec<SeriesRow>,
}

impl FlowSeries {
    pub fn read_csv(path: &Path) -> RecordsResult<Self> {
        let bad_row = |what: String| RecordsError::BadSeriesRow {
            path: path.to_path_buf(),
            what,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows: Vec<SeriesRow> = Vec::new();
        for result in reader.records() {
            let record = result?;
            let stamp = record
                .get(0)
                .ok_or_else(|| bad_row("empty row".to_string()))?;
            let date =
                parse_stamp(stamp).map_err(|_| bad_row(format!("bad date stamp {stamp:?}")))?;

            let mut values = Vec::with_capacity(record.len().saturating_sub(1));
            for field in record.iter().skip(1) {
                let value: f64 = field
                    .parse()
                    .map_err(|_| bad_row(format!("bad discharge value {field:?}")))?;
                values.push(value);
            }

            if let Some(prev) = rows.last() {
                if values.len() != prev.values.len() {
                    return Err(RecordsError::SeriesShapeMismatch {
                        expected: prev.values.len(),
                        found: values.len(),
                    });
                }
                if date != next_day(prev.date) {
                    return Err(bad_row(format!(
                        "rows not contiguous: {} then {}",
                        format_stamp(prev.date),
                        format_stamp(date)
                    )));
                }
            }
            rows.push(SeriesRow { date, values });
        }

        if rows.is_empty() {
            return Err(RecordsError::EmptySeries {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { rows })
    }

    /// Persist the series, replacing `path` atomically.
    pub fn write_csv(&self, path: &Path) -> RecordsResult<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for row in &self.rows {
            let mut fields = Vec::with_capacity(row.values.len() + 1);
            fields.push(format_stamp(row.date));
            fields.extend(row.values.iter().map(|v| v.to_string()));
            writer.write_record(&fields)?;
        }
        writer.flush()?;
        let bytes = writer
            .into_inner()
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;
        write_atomic(path, &bytes)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Discharge values per row.
    pub fn width(&self) -> usize {
        self.rows[0].values.len()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.rows[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.rows[self.rows.len() - 1].date
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Concatenate `addition` after this series. The caller has already
    /// checked the boundary; row contiguity then holds by construction.
    pub fn append(&mut self, addition: FlowSeries) {
        self.rows.extend(addition.rows);
    }
}
