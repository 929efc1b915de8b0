//! Calendar arithmetic on local wall-clock time.
//!
//! Month and year steps clamp to the last valid day of the target month:
//! Jan 31 + 1 month is Feb 29 in a leap year (Feb 28 otherwise), and
//! Feb 29 + 1 year is Feb 28. Years are twelve-month steps.
//! Overflow saturates at `NaiveDateTime::MAX`.

use chrono::{Days, Months, NaiveDateTime};

use crate::task::RecurrenceUnit;

/// Add `interval` units to a local date-time. `RecurrenceUnit::None` returns `at` unchanged.
pub fn add_interval(at: NaiveDateTime, unit: RecurrenceUnit, interval: u32) -> NaiveDateTime {
    let stepped = match unit {
        RecurrenceUnit::None => Some(at),
        RecurrenceUnit::Days => at.checked_add_days(Days::new(u64::from(interval))),
        RecurrenceUnit::Weeks => at.checked_add_days(Days::new(u64::from(interval) * 7)),
        RecurrenceUnit::Months => at.checked_add_months(Months::new(interval)),
        RecurrenceUnit::Years => interval
            .checked_mul(12)
            .and_then(|m| at.checked_add_months(Months::new(m))),
    };
    stepped.unwrap_or(NaiveDateTime::MAX)
}
