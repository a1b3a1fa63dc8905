//! Time sources for document timestamps.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, PoisonError};

/// Supplies the current UTC time to the registry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Set the clock to an absolute instant.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
