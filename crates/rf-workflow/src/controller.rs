//! The one-cycle workflow controller.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{info, warn};

use rf_basin::{discover_regions, RunoffCatalog};
use rf_records::{DateLedger, RecordStore};
use rf_solver::SolverLimits;

use crate::error::{WorkflowError, WorkflowResult};
use crate::report::{CycleReport, RegionReport};
use crate::runner::{run_region, RegionContext};

/// File the last cycle's report is persisted to, inside the ledger directory.
pub const REPORT_FILE: &str = "cycle_report.json";

/// Filesystem roots for one workflow invocation.
#[derive(Debug, Clone)]
pub struct CyclePaths {
    pub solver_exe: PathBuf,
    pub runoff_dir: PathBuf,
    /// Contains `input/<region>` and `output/<region>`.
    pub io_root: PathBuf,
    pub ledger_dir: PathBuf,
    pub records_root: PathBuf,
}

/// Tunables for one cycle.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    pub max_window_days: u32,
    pub solver_timeout: Duration,
    /// Regions simulated concurrently. Regions share no mutable state, so
    /// this is bounded only by solver process appetite.
    pub jobs: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_window_days: 366,
            solver_timeout: Duration::from_secs(21_600),
            jobs: 1,
        }
    }
}

/// Run one complete cycle: ledger read, all regions, single commit.
///
/// The ledger is the only cross-region state and advances to the minimum
/// confirmed end date, and only when no region failed. Completed regions
/// keep their merged records even when the ledger holds still; their next
/// attempt resumes from their own state, so re-running after any failure or
/// crash is safe.
pub fn run_cycle(paths: &CyclePaths, config: &CycleConfig) -> WorkflowResult<CycleReport> {
    if config.max_window_days == 0 {
        return Err(WorkflowError::InvalidArg {
            what: "max_window_days must be at least 1".to_string(),
        });
    }

    let ledger = DateLedger::in_dir(&paths.ledger_dir);
    let ledger_date = ledger.read()?;
    let runoff = RunoffCatalog::scan(&paths.runoff_dir)?;
    let regions = discover_regions(&paths.io_root)?;
    info!(
        ledger = %rf_core::format_stamp(ledger_date),
        regions = regions.len(),
        forcing_files = runoff.len(),
        "cycle starting"
    );

    let records = RecordStore::new(paths.records_root.clone());
    let ctx = RegionContext {
        solver_exe: &paths.solver_exe,
        runoff_dir: &paths.runoff_dir,
        runoff: &runoff,
        records: &records,
        ledger_date,
        max_window_days: config.max_window_days,
        limits: SolverLimits {
            timeout: config.solver_timeout,
        },
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.max(1))
        .build()
        .map_err(|err| WorkflowError::Backend {
            message: err.to_string(),
        })?;
    let region_reports: Vec<RegionReport> = pool.install(|| {
        regions
            .par_iter()
            .map(|region| run_region(region, &ctx))
            .collect()
    });

    let mut report = CycleReport {
        ledger_before: ledger_date,
        ledger_after: ledger_date,
        advanced: false,
        latest_runoff: runoff.latest(),
        regions: region_reports,
    };

    if report.any_failed() {
        warn!("cycle partially failed, ledger holds");
    } else if let Some(new_date) = report.completed_min_end() {
        // every Done window starts after the ledger date, so this is
        // always a strict advance
        debug_assert!(new_date > ledger_date);
        ledger.write(new_date)?;
        report.ledger_after = new_date;
        report.advanced = true;
    } else {
        info!("no region produced new output, ledger holds");
    }

    persist_report(paths, &report)?;
    Ok(report)
}

fn persist_report(paths: &CyclePaths, report: &CycleReport) -> WorkflowResult<()> {
    let path = paths.ledger_dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
