// src/timer.rs
//
// Recurring wake-up task with a cancellation handle.
//
// The task never sleeps itself: callers ask whether it is due at a given
// time, so a simulated clock can drive it in tests and a real loop can sleep
// until `next_wake()`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cancels a [`RecurringTask`]. Cheap to clone; all clones share one flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Fires every `period` seconds until cancelled.
#[derive(Debug, Clone)]
pub struct RecurringTask {
    period: f64,
    next_wake: f64,
    handle: CancelHandle,
}

impl RecurringTask {
    /// First wake-up at `first_wake` (seconds).
    pub fn new(period: Duration, first_wake: f64) -> Self {
        Self {
            period: period.as_secs_f64(),
            next_wake: first_wake,
            handle: CancelHandle::new(),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    pub fn next_wake(&self) -> f64 {
        self.next_wake
    }

    /// Returns `true` and re-arms if the task is due at `now`.
    ///
    /// A late caller gets one firing, not a burst of missed ones; the next
    /// wake-up is scheduled one period after `now`.
    pub fn fire_if_due(&mut self, now: f64) -> bool {
        if self.is_cancelled() || now < self.next_wake {
            return false;
        }
        self.next_wake = now + self.period;
        true
    }
}
