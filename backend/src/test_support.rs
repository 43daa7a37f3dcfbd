//! Test utilities for the carshare crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at `utc_now`.
    #[must_use]
    pub const fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Default for FixtureClock {
    fn default() -> Self {
        Self::new(fixture_timestamp())
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock that moves forward by a fixed step every time it is read.
///
/// Trips created through a service using this clock get strictly increasing
/// timestamps, so "latest trip" ordering is deterministic.
#[derive(Debug)]
pub struct SteppingClock {
    next_micros: AtomicI64,
    step_micros: i64,
}

impl SteppingClock {
    /// Start at `start` and advance by `step` on every read.
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next_micros: AtomicI64::new(start.timestamp_micros()),
            step_micros: step.num_microseconds().unwrap_or(i64::MAX),
        }
    }

    fn tick(&self) -> DateTime<Utc> {
        let micros = self.next_micros.fetch_add(self.step_micros, Ordering::SeqCst);
        DateTime::from_timestamp_micros(micros).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new(fixture_timestamp(), Duration::seconds(1))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.tick().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.tick()
    }
}

/// A fixed instant used by fixtures: 2026-02-24T10:30:00Z.
#[must_use]
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn stepping_clock_advances_each_read() {
        let clock = SteppingClock::default();
        let first = clock.utc();
        let second = clock.utc();
        assert_eq!(second - first, Duration::seconds(1));
        assert_eq!(first, fixture_timestamp());
    }

    #[rstest]
    fn fixture_clock_is_frozen() {
        let clock = FixtureClock::default();
        assert_eq!(clock.utc(), clock.utc());
    }
}
