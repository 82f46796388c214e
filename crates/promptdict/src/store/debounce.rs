//! Trailing debounce for snapshot writes.
//!
//! The scheduler holds no timer of its own: callers report changes with
//! [`PersistScheduler::touch`] and poll with [`PersistScheduler::take_due`], passing the
//! current [`Instant`]. This keeps it deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PersistScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl PersistScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a change at `now`, pushing the deadline to `now + delay`.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` and clears the pending write if the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Clears and reports any pending write regardless of the deadline.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
