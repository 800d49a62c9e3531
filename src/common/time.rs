//! Wall-clock access behind a trait so expiration behavior is testable
//! with simulated time.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::Utc;

/// Get current Unix timestamp in milliseconds (UTC)
pub fn unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Clock abstraction used by the store and the use cases.
///
/// Store expirations are evaluated lazily against this clock, so tests
/// can advance time without sleeping.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds.
    fn now_millis(&self) -> i64;
}

/// System clock backed by `chrono`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        unix_timestamp_millis()
    }
}

/// Manually driven clock for tests.
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Create a manual clock starting at the given timestamp.
    pub fn new(start_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicI64::new(start_millis),
        })
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    /// Advance the clock by the given number of seconds.
    pub fn advance_secs(&self, delta: i64) {
        self.advance_millis(delta * 1000);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
