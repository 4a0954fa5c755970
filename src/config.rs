// src/config.rs

use std::time::Duration;

/// Interval between scheduler wake-ups.
pub const DEFAULT_LOOKAHEAD_PERIOD: Duration = Duration::from_millis(25);

/// A cycle is materialized once its start is this close (seconds).
pub const DEFAULT_SCHEDULE_AHEAD: f64 = 0.1;

/// Delay between `start()` and the first cycle (seconds).
pub const DEFAULT_START_DELAY: f64 = 0.5;

pub const DEFAULT_CYCLES_PER_SECOND: f64 = 1.0;

/// Scheduler timing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// How often the loop wakes up.
    pub lookahead_period: Duration,
    /// How far ahead of a cycle's start the loop materializes it (seconds).
    /// Must exceed `lookahead_period` to absorb wake-up jitter.
    pub schedule_ahead: f64,
    /// Delay before the first cycle after `start()` (seconds).
    pub start_delay: f64,
    /// Initial tempo.
    pub cycles_per_second: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead_period: DEFAULT_LOOKAHEAD_PERIOD,
            schedule_ahead: DEFAULT_SCHEDULE_AHEAD,
            start_delay: DEFAULT_START_DELAY,
            cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookahead_period(mut self, period: Duration) -> Self {
        self.lookahead_period = period;
        self
    }

    pub fn with_schedule_ahead(mut self, seconds: f64) -> Self {
        self.schedule_ahead = seconds;
        self
    }

    pub fn with_start_delay(mut self, seconds: f64) -> Self {
        self.start_delay = seconds;
        self
    }

    pub fn with_cycles_per_second(mut self, cycles_per_second: f64) -> Self {
        self.cycles_per_second = cycles_per_second;
        self
    }
}
