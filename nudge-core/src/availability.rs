//! Availability predicate and the level queries built on it.
//!
//! Reads only the cached `next_available_at`; the cache is written by the
//! completion transition and backfilled on load, so every read site agrees.

use chrono::{DateTime, Utc};

use crate::task::{EffortLevel, Task};

/// Is `task` eligible to be shown at `now`?
///
/// - incomplete: always
/// - completed one-time: never (archived)
/// - completed recurring: once `now` reaches the cached reopen instant
pub fn is_available(task: &Task, now: DateTime<Utc>) -> bool {
    if !task.is_completed {
        return true;
    }
    if task.is_one_time() {
        return false;
    }
    match task.next_available_at {
        Some(next) => now >= next,
        None => false,
    }
}

/// Completed one-time tasks never come back.
pub fn is_archived(task: &Task) -> bool {
    task.is_completed && task.is_one_time()
}

/// Available tasks at `level`, in collection order.
pub fn tasks_for_level<'a>(tasks: &'a [Task], level: EffortLevel, now: DateTime<Utc>) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.level == level && is_available(t, now))
        .collect()
}

pub fn count_available(tasks: &[Task], level: EffortLevel, now: DateTime<Utc>) -> usize {
    tasks
        .iter()
        .filter(|t| t.level == level && is_available(t, now))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::RecurrenceUnit;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn incomplete_is_available() {
        let t = Task::new("a", "a", EffortLevel::Low);
        assert!(is_available(&t, base()));
    }

    #[test]
    fn completed_one_time_is_terminal() {
        let mut t = Task::new("a", "a", EffortLevel::Low);
        t.is_completed = true;
        t.last_completed_at = Some(base());
        for days in [0, 1, 365, 365 * 50] {
            assert!(!is_available(&t, base() + Duration::days(days)));
        }
        assert!(is_archived(&t));
    }

    #[test]
    fn recurring_reopens_at_cached_instant_and_stays_open() {
        let mut t = Task::new("a", "a", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 1);
        t.is_completed = true;
        t.last_completed_at = Some(base());
        let reopen = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        t.next_available_at = Some(reopen);

        assert!(!is_available(&t, reopen - Duration::seconds(1)));
        assert!(is_available(&t, reopen));
        assert!(is_available(&t, reopen + Duration::days(30)));
        assert!(!is_archived(&t));
    }

    #[test]
    fn level_filter_respects_availability() {
        let mut done = Task::new("b", "b", EffortLevel::Low);
        done.is_completed = true;
        let tasks = vec![
            Task::new("a", "a", EffortLevel::Low),
            done,
            Task::new("c", "c", EffortLevel::High),
        ];
        let low = tasks_for_level(&tasks, EffortLevel::Low, base());
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, "a");
        assert_eq!(count_available(&tasks, EffortLevel::High, base()), 1);
        assert_eq!(count_available(&tasks, EffortLevel::Medium, base()), 0);
    }
}
