//! rf-core: stable foundation for riverflow.
//!
//! Contains:
//! - stamp (`YYYYMMDD` date stamps and day arithmetic)
//! - window (simulation windows + the filename date-range codec)
//! - error (shared error types)

pub mod error;
pub mod stamp;
pub mod window;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use stamp::{add_days, format_stamp, next_day, parse_stamp};
pub use window::DateWindow;
