use chrono::{DateTime, Utc};

/// Source of "now" for session timestamps. Tests and the `--now` CLI flag
/// pin it to an instant so durations and deadlines are reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Pinned to `at` when given, wall time otherwise.
    #[must_use]
    pub fn from_override(at: Option<DateTime<Utc>>) -> Self {
        at.map_or(Self::System, Self::Fixed)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// 2023-11-14T22:13:20Z, the epoch every test attempt starts from.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

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
    fn override_pins_the_clock() {
        let at = fixed_now() + Duration::minutes(90);
        let clock = Clock::from_override(Some(at));
        assert_eq!(clock, Clock::Fixed(at));
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn no_override_reads_wall_time() {
        let clock = Clock::from_override(None);
        assert_eq!(clock, Clock::System);
        assert!(clock.now() > fixed_now());
    }
}
