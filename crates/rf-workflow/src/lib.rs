//! rf-workflow: one-cycle orchestration of the incremental routing update.
//!
//! A cycle reads the ledger once, drives every region independently through
//! locate -> invoke -> resolve -> merge, and commits the ledger exactly once
//! at the end, only if no region failed. Region failures never abort their
//! siblings, and a crashed or partially failed cycle can simply be re-run:
//! each region re-derives its resume point from its own on-disk state.

pub mod controller;
pub mod error;
pub mod report;
pub mod runner;

pub use controller::{run_cycle, CycleConfig, CyclePaths};
pub use error::{WorkflowError, WorkflowResult};
pub use report::{CycleReport, RegionOutcome, RegionReport, RunnerStage, SkipReason};
pub use runner::{run_region, RegionContext};
