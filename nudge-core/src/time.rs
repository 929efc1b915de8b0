//! Time utilities: the local day boundary used by every availability decision.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::TimezoneError;

/// Where "a day" starts for the user.
///
/// Recurrence is normalized to the start of a local calendar day, so the
/// resolver, the completion transition and the stats all need the same zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    tz: Tz,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl DayBoundary {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::default()
    }

    /// Build from an IANA name like "America/Chicago".
    pub fn from_name(name: &str) -> Result<Self, TimezoneError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| TimezoneError(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Calendar date of `at` in the local zone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.tz).date_naive()
    }

    /// Wall-clock reading of `at` in the local zone.
    pub fn local_datetime(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.tz).naive_local()
    }

    /// Map a local wall-clock time back to UTC.
    ///
    /// Ambiguous times take the earliest reading; times inside a DST gap move
    /// forward to the first instant that exists.
    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let mut probe = local;
        // DST gaps are at most a couple of hours; walk forward in 15 min steps.
        for _ in 0..16 {
            match self.tz.from_local_datetime(&probe) {
                LocalResult::Single(dt) => return dt.with_timezone(&Utc),
                LocalResult::Ambiguous(early, _) => return early.with_timezone(&Utc),
                LocalResult::None => match probe.checked_add_signed(Duration::minutes(15)) {
                    Some(next) => probe = next,
                    None => break,
                },
            }
        }
        Utc.from_utc_datetime(&local)
    }

    /// First instant of the given local date.
    pub fn start_of_date(&self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date.and_time(chrono::NaiveTime::MIN))
    }

    /// First instant of the local day containing `at`.
    pub fn start_of_day(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_date(self.local_date(at))
    }

    /// Whole calendar days from `from` to `to` in the local zone (negative if `to` is earlier).
    pub fn calendar_days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        (self.local_date(to) - self.local_date(from)).num_days()
    }
}

/// Parse a local time like "2026-02-20 23:59" (or a bare date) in the boundary's zone,
/// returning UTC.
pub fn parse_local_to_utc(local: &str, boundary: &DayBoundary) -> Option<DateTime<Utc>> {
    let local = local.trim();
    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })?;
    Some(boundary.to_utc(ndt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_day_in_chicago() {
        let b = DayBoundary::from_name("America/Chicago").unwrap();
        // 2026-02-21 03:00 UTC is still Feb 20 in Chicago (UTC-6).
        let at = Utc.with_ymd_and_hms(2026, 2, 21, 3, 0, 0).unwrap();
        let start = b.start_of_day(at);
        assert_eq!(start.to_rfc3339(), "2026-02-20T06:00:00+00:00");
    }

    #[test]
    fn dst_gap_midnight_moves_forward() {
        // Havana springs forward at midnight: 2024-03-10 00:00 does not exist.
        let b = DayBoundary::from_name("America/Havana").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let start = b.start_of_date(date);
        assert_eq!(b.local_date(start), date);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        assert!(DayBoundary::from_name("Mars/Olympus").is_err());
    }

    #[test]
    fn parses_local_input_forms() {
        let b = DayBoundary::utc();
        let a = parse_local_to_utc("2024-01-01 10:00", &b).unwrap();
        assert_eq!(a, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        let d = parse_local_to_utc("2024-01-02", &b).unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert!(parse_local_to_utc("tomorrow", &b).is_none());
    }

    #[test]
    fn calendar_days_ignore_time_of_day() {
        let b = DayBoundary::utc();
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap();
        assert_eq!(b.calendar_days_between(from, to), 1);
    }
}
