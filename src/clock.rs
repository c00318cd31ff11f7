//! Wall-clock abstraction.
//!
//! Past-slot detection depends on "now" at call time, and the calendar is
//! long-lived in a session, so callers must ask the clock on every check
//! instead of caching an instant. Injecting the clock keeps the week-grid
//! and selection logic deterministic under test.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test double pinned to a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
