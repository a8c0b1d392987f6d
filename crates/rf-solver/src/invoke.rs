//! Blocking invocation of the external solver.

use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use rf_core::{format_stamp, DateWindow};

use crate::error::{SolverError, SolverResult};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Wall-clock limits applied to one solver run.
#[derive(Debug, Clone, Copy)]
pub struct SolverLimits {
    pub timeout: Duration,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            // six hours: a full-year window over a large basin is slow
            timeout: Duration::from_secs(21_600),
        }
    }
}

/// A fully wired solver run for one region and one requested window.
///
/// On success the solver leaves `qout_<start>to<end_actual>.csv` in
/// `output_dir` and a fresh `qinit_<start>to<end_actual>.csv` in
/// `input_dir`; both are its side effects, not ours.
#[derive(Debug, Clone)]
pub struct SolverInvocation {
    pub executable: PathBuf,
    pub region: String,
    pub input_dir: PathBuf,
    pub weight_table: PathBuf,
    pub initial_condition: PathBuf,
    pub runoff_dir: PathBuf,
    pub output_dir: PathBuf,
    pub window: DateWindow,
}

impl SolverInvocation {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(&self.input_dir)
            .arg(&self.weight_table)
            .arg(&self.initial_condition)
            .arg(&self.runoff_dir)
            .arg(&self.output_dir)
            .arg(format_stamp(self.window.start))
            .arg(format_stamp(self.window.end));
        cmd
    }

    /// Run the solver to completion. Blocks the calling thread.
    ///
    /// A run that outlives the timeout is killed and reported the same way
    /// as a nonzero exit: the region's cycle fails, nothing is merged.
    pub fn run(&self, limits: SolverLimits) -> SolverResult<()> {
        info!(
            region = %self.region,
            window = %self.window.token(),
            executable = %self.executable.display(),
            "launching solver"
        );
        let mut child = self.command().spawn().map_err(|source| SolverError::Launch {
            region: self.region.clone(),
            source,
        })?;

        let deadline = Instant::now() + limits.timeout;
        loop {
            match child.try_wait()? {
                Some(status) if status.success() => {
                    info!(region = %self.region, "solver run complete");
                    return Ok(());
                }
                Some(status) => {
                    return Err(SolverError::InvocationFailed {
                        region: self.region.clone(),
                        status,
                    });
                }
                None if Instant::now() >= deadline => {
                    warn!(region = %self.region, "solver unresponsive, killing");
                    // kill can only fail if the child exited in between; wait reaps either way
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SolverError::TimedOut {
                        region: self.region.clone(),
                        seconds: limits.timeout.as_secs(),
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        }
    }
}
