//! Wall-clock source for the `ids:issued` timestamp of outbound headers.

use chrono::{DateTime, Utc};

/// Abstraction over the system clock for dependency injection.
///
/// Allows deterministic header tests by replacing the real clock with a fixed one.
/// The default implementation ([`SystemClock`]) delegates to `chrono::Utc::now`.
pub trait ClockSource: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Default clock source that reads the real system time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant. Used by tests and replay tooling.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Utc>);

impl ClockSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
