use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;

pub trait Clock: Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// ISO 8601 with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `YYYY-MM-DD`, the prefix of [`iso_timestamp`].
pub fn day_prefix(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_timestamp_matches_day_prefix() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 15, 0).unwrap();
        let stamp = iso_timestamp(at);
        assert_eq!(stamp, "2026-10-19T08:15:00.000Z");
        assert!(stamp.starts_with(&day_prefix(at)));
        assert_eq!(parse_timestamp(&stamp), Some(at));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();
        handle.advance(Duration::days(1));
        assert_eq!(clock.now(), start + Duration::days(1));
    }
}
