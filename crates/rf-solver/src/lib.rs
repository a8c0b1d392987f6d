//! rf-solver: boundary to the external routing solver.
//!
//! The solver itself is an opaque executable; this crate wires one region's
//! inputs into a blocking invocation, enforces a wall-clock limit, and
//! recovers the window the solver *actually* computed from the artifact it
//! left behind. The achieved window is ground truth: it may fall short of
//! the request whenever less forcing was usable than advertised.

pub mod artifact;
pub mod error;
pub mod invoke;

pub use artifact::{find_artifact, resolve_window};
pub use error::{SolverError, SolverResult};
pub use invoke::{SolverInvocation, SolverLimits};
