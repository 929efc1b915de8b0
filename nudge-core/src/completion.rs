//! Completion transition and settings edits.
//!
//! Both are pure: they take a task by value and hand back the updated copy.
//! `last_completed_at` and `next_available_at` always move together.

use chrono::{DateTime, Utc};

use crate::recurrence::next_available_date;
use crate::task::{Task, TaskPatch};
use crate::time::DayBoundary;

/// Mark a task done (`true`) or not done (`false`).
///
/// Re-completing an already completed task restarts its recurrence clock at `now`.
pub fn set_completion(mut task: Task, is_completed: bool, now: DateTime<Utc>, boundary: &DayBoundary) -> Task {
    if is_completed {
        task.is_completed = true;
        task.last_completed_at = Some(now);
        task.next_available_at = next_available_date(&task, boundary);
    } else {
        task.is_completed = false;
        task.last_completed_at = None;
        task.next_available_at = None;
    }
    task
}

/// Recompute the cached reopen instant from the current settings.
///
/// Clears it when the task is incomplete or one-time.
pub fn recompute_next_available(mut task: Task, boundary: &DayBoundary) -> Task {
    task.next_available_at = if task.is_completed {
        next_available_date(&task, boundary)
    } else {
        None
    };
    task
}

/// Apply an edit. Recurrence changes on a completed task re-derive the cache.
///
/// A zero interval in the patch is ignored; intervals are always >= 1.
pub fn apply_patch(mut task: Task, patch: &TaskPatch, boundary: &DayBoundary) -> Task {
    if let Some(title) = patch.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        task.title = title.to_string();
    }
    if let Some(level) = patch.level {
        task.level = level;
    }
    if let Some(unit) = patch.recurrence_unit {
        task.recurrence_unit = unit;
    }
    if let Some(interval) = patch.recurrence_interval.filter(|n| *n >= 1) {
        task.recurrence_interval = interval;
    }

    if patch.touches_recurrence() {
        task = recompute_next_available(task, boundary);
    }
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::is_available;
    use crate::task::{EffortLevel, RecurrenceUnit};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn daily_task_reopens_next_midnight() {
        let b = DayBoundary::utc();
        let t = Task::new("a", "stretch", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 1);
        let done = set_completion(t, true, at(2024, 1, 1, 10, 0), &b);

        assert_eq!(done.next_available_at, Some(at(2024, 1, 2, 0, 0)));
        assert!(!is_available(&done, at(2024, 1, 1, 23, 0)));
        assert!(is_available(&done, at(2024, 1, 2, 0, 1)));
    }

    #[test]
    fn one_time_completion_has_no_reopen() {
        let b = DayBoundary::utc();
        let t = Task::new("a", "file taxes", EffortLevel::High);
        let done = set_completion(t, true, at(2024, 4, 1, 9, 0), &b);
        assert!(done.is_completed);
        assert_eq!(done.last_completed_at, Some(at(2024, 4, 1, 9, 0)));
        assert!(done.next_available_at.is_none());
    }

    #[test]
    fn uncomplete_clears_both_timestamps() {
        let b = DayBoundary::utc();
        let t = Task::new("a", "a", EffortLevel::Medium).with_recurrence(RecurrenceUnit::Weeks, 1);
        let round = set_completion(set_completion(t, true, at(2024, 1, 1, 0, 0), &b), false, at(2024, 1, 1, 1, 0), &b);
        assert!(!round.is_completed);
        assert!(round.last_completed_at.is_none());
        assert!(round.next_available_at.is_none());
    }

    #[test]
    fn recompleting_restarts_the_clock() {
        let b = DayBoundary::utc();
        let t = Task::new("a", "a", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 2);
        let first = set_completion(t, true, at(2024, 1, 1, 8, 0), &b);
        let second = set_completion(first, true, at(2024, 1, 5, 8, 0), &b);
        assert_eq!(second.next_available_at, Some(at(2024, 1, 7, 0, 0)));
    }

    #[test]
    fn editing_recurrence_recomputes_cache() {
        let b = DayBoundary::utc();
        let t = Task::new("a", "a", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 1);
        let done = set_completion(t, true, at(2024, 1, 1, 10, 0), &b);

        let weekly = apply_patch(
            done.clone(),
            &TaskPatch {
                recurrence_unit: Some(RecurrenceUnit::Weeks),
                ..Default::default()
            },
            &b,
        );
        assert_eq!(weekly.next_available_at, Some(at(2024, 1, 8, 0, 0)));

        let once = apply_patch(
            done,
            &TaskPatch {
                recurrence_unit: Some(RecurrenceUnit::None),
                ..Default::default()
            },
            &b,
        );
        assert!(once.next_available_at.is_none());
        assert!(!is_available(&once, at(2030, 1, 1, 0, 0)));
    }

    #[test]
    fn title_only_edit_keeps_cache_and_ignores_blank_title() {
        let b = DayBoundary::utc();
        let t = Task::new("a", "old", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 1);
        let done = set_completion(t, true, at(2024, 1, 1, 10, 0), &b);
        let cached = done.next_available_at;

        let renamed = apply_patch(
            done,
            &TaskPatch {
                title: Some("  new  ".into()),
                ..Default::default()
            },
            &b,
        );
        assert_eq!(renamed.title, "new");
        assert_eq!(renamed.next_available_at, cached);

        let blank = apply_patch(
            renamed,
            &TaskPatch {
                title: Some("   ".into()),
                recurrence_interval: Some(0),
                ..Default::default()
            },
            &b,
        );
        assert_eq!(blank.title, "new");
        assert_eq!(blank.recurrence_interval, 1);
    }
}
