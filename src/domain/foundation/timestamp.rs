//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from provider Unix seconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// RFC 3339 with millisecond precision, e.g. `2024-03-15T12:00:00.000Z`.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of hours.
    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }

    /// First instant of this timestamp's calendar month.
    pub fn start_of_month(&self) -> Self {
        let start = Utc
            .with_ymd_and_hms(self.0.year(), self.0.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(self.0);
        Self(start)
    }

    /// First instant of the calendar month after this one.
    pub fn start_of_next_month(&self) -> Self {
        let (year, month) = if self.0.month() == 12 {
            (self.0.year() + 1, 1)
        } else {
            (self.0.year(), self.0.month() + 1)
        };
        let start = Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .unwrap_or(self.0);
        Self(start)
    }

    /// First instant of the calendar month before this one.
    pub fn start_of_previous_month(&self) -> Self {
        let (year, month) = if self.0.month() == 1 {
            (self.0.year() - 1, 12)
        } else {
            (self.0.year(), self.0.month() - 1)
        };
        let start = Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .unwrap_or(self.0);
        Self(start)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_unix_secs_round_trips() {
        let ts = Timestamp::from_unix_secs(1_704_067_200);
        assert_eq!(ts.as_unix_secs(), 1_704_067_200);
    }

    #[test]
    fn plus_hours_moves_forward() {
        let ts = Timestamp::from_unix_secs(0);
        assert_eq!(ts.plus_hours(24).as_unix_secs(), 86_400);
    }

    #[test]
    fn start_of_month_truncates_to_first_day() {
        // 2024-03-15T12:00:00Z
        let ts = Timestamp::from_unix_secs(1_710_504_000);
        let start = ts.start_of_month();
        assert_eq!(start.as_datetime().day(), 1);
        assert_eq!(start.as_datetime().month(), 3);
    }

    #[test]
    fn start_of_previous_month_wraps_year() {
        // 2024-01-10T00:00:00Z
        let ts = Timestamp::from_unix_secs(1_704_844_800);
        let prev = ts.start_of_previous_month();
        assert_eq!(prev.as_datetime().year(), 2023);
        assert_eq!(prev.as_datetime().month(), 12);
    }

    #[test]
    fn start_of_next_month_wraps_year() {
        // 2023-12-31T23:00:00Z
        let ts = Timestamp::from_unix_secs(1_704_063_600);
        let next = ts.start_of_next_month();
        assert_eq!(next.as_datetime().year(), 2024);
        assert_eq!(next.as_datetime().month(), 1);
        assert_eq!(next.as_datetime().day(), 1);
    }

    #[test]
    fn rfc3339_uses_zulu_millis() {
        let ts = Timestamp::from_unix_secs(1_710_504_000);
        assert_eq!(ts.to_rfc3339(), "2024-03-15T12:00:00.000Z");
    }

    #[test]
    fn ordering_helpers() {
        let a = Timestamp::from_unix_secs(10);
        let b = Timestamp::from_unix_secs(20);
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
    }
}
