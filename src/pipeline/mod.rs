//! Pipeline entry points.
//!
//! - `Refresher::run_cycle`: fetch, build, write and track once
//! - `run_daemon`: repeat cycles with randomized sleeps until shutdown

pub mod daemon;
pub mod diff;
pub mod refresh;
pub mod schedule;

#[cfg(test)]
pub(crate) mod fixtures;

pub use daemon::{DaemonSummary, run_daemon};
pub use diff::SeenDiff;
pub use refresh::{CycleReport, Refresher};
pub use schedule::IntervalSchedule;
