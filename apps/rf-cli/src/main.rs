use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rf_workflow::{
    run_cycle, CycleConfig, CyclePaths, RegionOutcome, RegionReport, SkipReason, WorkflowError,
    WorkflowResult,
};

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(about = "RiverFlow CLI - incremental river-routing simulation updater", long_about = None)]
struct Cli {
    /// Path to the external routing solver executable
    solver_exe: PathBuf,
    /// Directory of dated gridded runoff files
    runoff_dir: PathBuf,
    /// Root input/output directory with one sub-directory per region under input/
    io_root: PathBuf,
    /// Directory holding the last-simulation-date marker
    ledger_dir: PathBuf,
    /// Root directory of per-region year records
    records_root: PathBuf,
    /// Longest window to request from the solver, in days
    #[arg(long, default_value_t = 366)]
    max_window_days: u32,
    /// Kill a solver run after this many seconds
    #[arg(long, default_value_t = 21_600)]
    solver_timeout_secs: u64,
    /// Number of regions to simulate concurrently
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

fn main() -> WorkflowResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    validate_paths(&cli)?;

    let paths = CyclePaths {
        solver_exe: cli.solver_exe,
        runoff_dir: cli.runoff_dir,
        io_root: cli.io_root,
        ledger_dir: cli.ledger_dir,
        records_root: cli.records_root,
    };
    let config = CycleConfig {
        max_window_days: cli.max_window_days,
        solver_timeout: Duration::from_secs(cli.solver_timeout_secs),
        jobs: cli.jobs.max(1),
    };

    let report = run_cycle(&paths, &config)?;

    for region in &report.regions {
        println!("{:<24} {}", region.region, describe(region));
    }
    println!(
        "ledger: {} -> {}{}",
        report.ledger_before.format("%Y%m%d"),
        report.ledger_after.format("%Y%m%d"),
        if report.advanced { "" } else { " (held)" }
    );

    if report.any_failed() {
        std::process::exit(2);
    }
    Ok(())
}

/// All five positional paths must exist before any region is touched.
fn validate_paths(cli: &Cli) -> WorkflowResult<()> {
    require(cli.solver_exe.is_file(), "solver executable", &cli.solver_exe)?;
    require(cli.runoff_dir.is_dir(), "runoff directory", &cli.runoff_dir)?;
    require(cli.io_root.is_dir(), "io root directory", &cli.io_root)?;
    require(cli.ledger_dir.is_dir(), "ledger directory", &cli.ledger_dir)?;
    require(
        cli.records_root.is_dir(),
        "records directory",
        &cli.records_root,
    )?;
    Ok(())
}

fn require(ok: bool, what: &str, path: &Path) -> WorkflowResult<()> {
    if ok {
        Ok(())
    } else {
        Err(WorkflowError::InvalidArg {
            what: format!("{what} not found: {}", path.display()),
        })
    }
}

fn describe(report: &RegionReport) -> String {
    match &report.outcome {
        RegionOutcome::Done { end_date } => {
            format!("done through {}", end_date.format("%Y%m%d"))
        }
        RegionOutcome::Skipped {
            reason: SkipReason::NoNewData,
        } => "skipped (no new data)".to_string(),
        RegionOutcome::Skipped {
            reason: SkipReason::NoForwardProgress,
        } => "skipped (no forward progress)".to_string(),
        RegionOutcome::Failed { stage, message } => {
            format!("FAILED at {stage:?}: {message}")
        }
    }
}
