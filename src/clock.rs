// src/clock.rs
//
// Time sources for the scheduler. All times are in seconds.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source.
pub trait Clock {
    /// Current time in seconds.
    fn now(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock for tests and offline rendering.
///
/// Clones share the same time, so a test keeps one copy and hands another
/// to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            time: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, time: f64) {
        self.time.set(time);
    }

    pub fn advance(&self, seconds: f64) {
        self.time.set(self.time.get() + seconds);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        self.time.get()
    }
}
