//! Per-region runner.
//!
//! Drives one region through `LocatingInitCondition -> Invoking ->
//! ResolvingWindow -> Merging` and reduces whatever happened to a terminal
//! [`RegionOutcome`]. Errors are captured, never propagated: a region's
//! failure is data for the controller, not an abort of the cycle.

use std::cmp;
use std::fmt::Display;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use rf_basin::{resume_point, Region, RunoffCatalog};
use rf_core::{add_days, next_day, DateWindow};
use rf_records::RecordStore;
use rf_solver::{find_artifact, resolve_window, SolverError, SolverInvocation, SolverLimits};

use crate::report::{RegionOutcome, RegionReport, RunnerStage, SkipReason};

/// Shared, read-only context for every region in one cycle.
#[derive(Debug, Clone, Copy)]
pub struct RegionContext<'a> {
    pub solver_exe: &'a Path,
    pub runoff_dir: &'a Path,
    pub runoff: &'a RunoffCatalog,
    pub records: &'a RecordStore,
    /// Ledger date read once at the start of the cycle.
    pub ledger_date: NaiveDate,
    /// Longest window to request from the solver, in days.
    pub max_window_days: u32,
    pub limits: SolverLimits,
}

fn fail(region: &Region, stage: RunnerStage, err: impl Display) -> RegionOutcome {
    warn!(region = %region.name, ?stage, %err, "region cycle failed");
    RegionOutcome::Failed {
        stage,
        message: err.to_string(),
    }
}

/// Run one region to a terminal state.
pub fn run_region(region: &Region, ctx: &RegionContext) -> RegionReport {
    RegionReport {
        region: region.name.clone(),
        outcome: run_to_outcome(region, ctx),
    }
}

fn run_to_outcome(region: &Region, ctx: &RegionContext) -> RegionOutcome {
    // LocatingInitCondition
    if let Err(err) = region.validate() {
        return fail(region, RunnerStage::LocatingInitCondition, err);
    }
    let init = match resume_point(&region.input_dir, ctx.ledger_date) {
        Ok(init) => init,
        Err(err) => return fail(region, RunnerStage::LocatingInitCondition, err),
    };

    let start = next_day(init.window.end);
    let available = match ctx.runoff.latest() {
        Some(date) if date >= start => date,
        _ => {
            info!(region = %region.name, "no forcing beyond resume point, skipping");
            return RegionOutcome::Skipped {
                reason: SkipReason::NoNewData,
            };
        }
    };
    let end_requested = cmp::min(
        add_days(start, u64::from(ctx.max_window_days).saturating_sub(1)),
        available,
    );
    let window = DateWindow::new(start, end_requested);

    // Invoking
    if let Err(err) = region.ensure_output_dir() {
        return fail(region, RunnerStage::Invoking, err);
    }
    let invocation = SolverInvocation {
        executable: ctx.solver_exe.to_path_buf(),
        region: region.name.clone(),
        input_dir: region.input_dir.clone(),
        weight_table: region.weight_table(),
        initial_condition: init.path.clone(),
        runoff_dir: ctx.runoff_dir.to_path_buf(),
        output_dir: region.output_dir.clone(),
        window,
    };
    if let Err(err) = invocation.run(ctx.limits) {
        return fail(region, RunnerStage::Invoking, err);
    }

    // ResolvingWindow: the artifact, not the request, says what was computed
    let artifact = match find_artifact(&region.output_dir, window.start) {
        Ok(path) => path,
        Err(err) => return fail(region, RunnerStage::ResolvingWindow, err),
    };
    let actual = match resolve_window(&artifact) {
        Ok(actual) => actual,
        Err(SolverError::WindowRegression { start, end }) => {
            warn!(region = %region.name, %start, %end, "solver made no forward progress");
            return RegionOutcome::Skipped {
                reason: SkipReason::NoForwardProgress,
            };
        }
        Err(err) => return fail(region, RunnerStage::ResolvingWindow, err),
    };
    if actual.end < window.end {
        info!(
            region = %region.name,
            requested = %window.token(),
            achieved = %actual.token(),
            "solver stopped short of the requested window"
        );
    }

    // Merging
    match ctx.records.merge(&region.name, &artifact, actual) {
        Ok(outcome) => {
            info!(region = %region.name, ?outcome, "merged");
            RegionOutcome::Done {
                end_date: actual.end,
            }
        }
        Err(err) => fail(region, RunnerStage::Merging, err),
    }
}
