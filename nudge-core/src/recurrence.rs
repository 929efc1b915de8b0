//! Recurrence resolver: when does a completed recurring task reopen?

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::calendar::add_interval;
use crate::error::RecurrenceParseError;
use crate::task::{RecurrenceUnit, Task};
use crate::time::DayBoundary;

/// Next instant a task becomes available again, normalized to the start of
/// that local calendar day.
///
/// `None` for one-time tasks and for tasks that were never completed.
pub fn next_available_date(task: &Task, boundary: &DayBoundary) -> Option<DateTime<Utc>> {
    if !task.recurrence_unit.is_recurring() {
        return None;
    }
    let last = task.last_completed_at?;

    let local = boundary.local_datetime(last);
    let stepped = add_interval(local, task.recurrence_unit, task.recurrence_interval.max(1));
    Some(boundary.start_of_date(stepped.date()))
}

/// A parsed `(interval, unit)` pair, e.g. from a `--every 2w` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub interval: u32,
    pub unit: RecurrenceUnit,
}

impl Recurrence {
    pub const ONCE: Recurrence = Recurrence {
        interval: 1,
        unit: RecurrenceUnit::None,
    };

    /// Accepts "3d", "2 weeks", "every month", "1y", "none", "once".
    pub fn parse(input: &str) -> Result<Self, RecurrenceParseError> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(concat!(
                r"^(?:every\s+)?(?P<n>\d+)?\s*",
                r"(?P<unit>d|days?|w|weeks?|m|months?|y|years?)$"
            ))
            .expect("static recurrence regex")
        });

        let s = input.trim().to_lowercase();
        if matches!(s.as_str(), "none" | "once" | "never") {
            return Ok(Self::ONCE);
        }

        let caps = re
            .captures(&s)
            .ok_or_else(|| RecurrenceParseError::Unrecognized(input.to_string()))?;

        let interval = match caps.name("n") {
            Some(n) => n
                .as_str()
                .parse::<u32>()
                .map_err(|_| RecurrenceParseError::Unrecognized(input.to_string()))?,
            None => 1,
        };
        if interval == 0 {
            return Err(RecurrenceParseError::ZeroInterval);
        }

        let unit = match &caps["unit"][..1] {
            "d" => RecurrenceUnit::Days,
            "w" => RecurrenceUnit::Weeks,
            "m" => RecurrenceUnit::Months,
            _ => RecurrenceUnit::Years,
        };

        Ok(Self { interval, unit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::EffortLevel;
    use chrono::TimeZone;

    fn completed(unit: RecurrenceUnit, interval: u32, at: DateTime<Utc>) -> Task {
        let mut t = Task::new("t", "task", EffortLevel::Low).with_recurrence(unit, interval);
        t.is_completed = true;
        t.last_completed_at = Some(at);
        t
    }

    #[test]
    fn three_days_lands_on_day_start() {
        let b = DayBoundary::utc();
        let d = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let next = next_available_date(&completed(RecurrenceUnit::Days, 3, d), &b).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn two_weeks_is_fourteen_days() {
        let b = DayBoundary::utc();
        let d = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let next = next_available_date(&completed(RecurrenceUnit::Weeks, 2, d), &b).unwrap();
        assert_eq!((next - d).num_days(), 14);
    }

    #[test]
    fn jan_31_plus_month_is_feb_29_in_2024() {
        let b = DayBoundary::utc();
        let d = Utc.with_ymd_and_hms(2024, 1, 31, 18, 0, 0).unwrap();
        let next = next_available_date(&completed(RecurrenceUnit::Months, 1, d), &b).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn local_zone_decides_the_day() {
        // 2024-01-02 03:00 UTC is the evening of Jan 1 in Chicago.
        let b = DayBoundary::from_name("America/Chicago").unwrap();
        let d = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        let next = next_available_date(&completed(RecurrenceUnit::Days, 1, d), &b).unwrap();
        // Local midnight Jan 2 (CST, UTC-6).
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap());
    }

    #[test]
    fn none_for_one_time_or_never_completed() {
        let b = DayBoundary::utc();
        let d = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(next_available_date(&completed(RecurrenceUnit::None, 1, d), &b).is_none());

        let fresh = Task::new("t", "x", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 1);
        assert!(next_available_date(&fresh, &b).is_none());
    }

    #[test]
    fn parse_shorthand() {
        assert_eq!(
            Recurrence::parse("3d").unwrap(),
            Recurrence { interval: 3, unit: RecurrenceUnit::Days }
        );
        assert_eq!(
            Recurrence::parse("2 Weeks").unwrap(),
            Recurrence { interval: 2, unit: RecurrenceUnit::Weeks }
        );
        assert_eq!(
            Recurrence::parse("every month").unwrap(),
            Recurrence { interval: 1, unit: RecurrenceUnit::Months }
        );
        assert_eq!(Recurrence::parse("once").unwrap(), Recurrence::ONCE);
        assert_eq!(Recurrence::parse("0d").unwrap_err(), RecurrenceParseError::ZeroInterval);
        assert!(Recurrence::parse("fortnightly").is_err());
    }
}
