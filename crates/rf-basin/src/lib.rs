//! rf-basin: region namespaces and their on-disk inputs.
//!
//! A region is an independently routed sub-basin with its own directory of
//! static inputs, weight table and rolling initial-condition files. This
//! crate knows how to find regions under the rapid-io root, how to pick the
//! initial-condition file a run must resume from, and what span of gridded
//! runoff forcing is available to simulate over.

pub mod error;
pub mod qinit;
pub mod region;
pub mod runoff;

pub use error::{BasinError, BasinResult};
pub use qinit::{locate_initial_condition, resume_point, InitialCondition};
pub use region::{discover_regions, Region};
pub use runoff::RunoffCatalog;
