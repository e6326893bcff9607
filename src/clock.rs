//! Time sources for the selector
//!
//! A clock is optional everywhere. When no clock is configured the selector
//! skips every timestamp prefix instead of inventing one.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Format used for timestamps embedded in prompts and queries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supplies the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Simulation clock that only moves when told to.
///
/// Each call to [`advance`](FixedIntervalClock::advance) moves the clock
/// forward by the configured step.
#[derive(Debug)]
pub struct FixedIntervalClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl FixedIntervalClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }

    pub fn advance(&self) {
        let mut current = self.current.lock();
        *current += self.step;
    }
}

impl Clock for FixedIntervalClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

/// Render a timestamp the way prompts and memory annotations expect it
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_interval_clock_advances_by_step() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = FixedIntervalClock::new(start, Duration::minutes(15));

        assert_eq!(clock.now(), start);
        clock.advance();
        clock.advance();
        assert_eq!(format_timestamp(&clock.now()), "2024-03-01 09:30:00");
    }

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
        assert!(now <= Utc::now());
    }

    #[test]
    fn test_closure_is_a_clock() {
        let fixed = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let clock = move || fixed;
        assert_eq!(Clock::now(&clock), fixed);
    }
}
