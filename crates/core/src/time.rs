use std::fmt;

use chrono::{DateTime, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Wall-clock time spent between two instants, in whole seconds.
///
/// Fractional seconds are floored; an end before the start counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed {
    minutes: i64,
    seconds: i64,
}

impl Elapsed {
    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::from_seconds((end - start).num_seconds())
    }

    #[must_use]
    pub fn from_seconds(total: i64) -> Self {
        let total = total.max(0);
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    #[must_use]
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    #[must_use]
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    #[must_use]
    pub fn total_seconds(&self) -> i64 {
        self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fixed_clock_never_moves() {
        let clock = Clock::fixed(fixed_now());
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn default_clock_follows_system_time() {
        let before = Utc::now();
        let now = Clock::default().now();
        assert!(now >= before);
        assert!(now <= Utc::now());
    }

    #[test]
    fn elapsed_floors_and_splits_minutes() {
        let start = fixed_now();
        let end = start + Duration::milliseconds(125_900);
        let elapsed = Elapsed::between(start, end);
        assert_eq!(elapsed.minutes(), 2);
        assert_eq!(elapsed.seconds(), 5);
        assert_eq!(elapsed.to_string(), "2m 5s");
    }

    #[test]
    fn elapsed_never_negative() {
        let start = fixed_now();
        let elapsed = Elapsed::between(start, start - Duration::seconds(10));
        assert_eq!(elapsed.total_seconds(), 0);
        assert_eq!(elapsed.to_string(), "0m 0s");
    }
}
