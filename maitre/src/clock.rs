//! Time source abstraction.
//!
//! Audit entries and reservation creation timestamps come from a [`Clock`] so
//! that tests can pin "now" and get deterministic FIFO ordering.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of the current UTC instant.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests.
///
/// Each call to [`Clock::now`] returns the current instant and then advances
/// it by the configured step, so consecutive writes get strictly increasing
/// timestamps.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use maitre::clock::{Clock, FixedClock};
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap();
/// let clock = FixedClock::new(start).with_step(Duration::seconds(1));
///
/// assert_eq!(clock.now(), start);
/// assert_eq!(clock.now(), start + Duration::seconds(1));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl FixedClock {
    /// Creates a clock frozen at `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(instant),
            step: Duration::zero(),
        }
    }

    /// Advances the clock by `step` after every reading.
    #[must_use]
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Moves the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let now = *current;
        *current = now + self.step;
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
