//! Randomized refresh interval.

use std::time::Duration;

use rand::Rng;

use crate::error::{AppError, Result};
use crate::models::ScheduleConfig;

/// Uniform delay between two bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSchedule {
    min: Duration,
    max: Duration,
}

impl IntervalSchedule {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            return Err(AppError::validation(format!(
                "minimum interval {min:?} exceeds maximum {max:?}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.min_interval_secs),
            Duration::from_secs(config.max_interval_secs),
        )
    }

    /// Draw the next delay, uniform over `[min, max]` at millisecond grain.
    pub fn next_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min..=max))
    }
}
