//! Per-cycle and per-region status reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stage a region run was in when it reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerStage {
    LocatingInitCondition,
    Invoking,
    ResolvingWindow,
    Merging,
}

/// Why a region sat a cycle out without failing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No forcing data beyond the region's resume point.
    NoNewData,
    /// The solver ran but achieved no forward progress.
    NoForwardProgress,
}

/// Terminal state of one region for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionOutcome {
    /// The region simulated and merged through `end_date`.
    Done { end_date: NaiveDate },
    Skipped { reason: SkipReason },
    Failed { stage: RunnerStage, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub region: String,
    pub outcome: RegionOutcome,
}

impl RegionReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, RegionOutcome::Failed { .. })
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.outcome {
            RegionOutcome::Done { end_date } => Some(end_date),
            _ => None,
        }
    }
}

/// Everything one cycle did, persisted as JSON next to the ledger marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub ledger_before: NaiveDate,
    pub ledger_after: NaiveDate,
    pub advanced: bool,
    pub latest_runoff: Option<NaiveDate>,
    pub regions: Vec<RegionReport>,
}

impl CycleReport {
    pub fn any_failed(&self) -> bool {
        self.regions.iter().any(RegionReport::is_failure)
    }

    /// Earliest confirmed end date across completed regions; the only date
    /// the ledger is allowed to advance to.
    pub fn completed_min_end(&self) -> Option<NaiveDate> {
        self.regions.iter().filter_map(RegionReport::end_date).min()
    }
}
