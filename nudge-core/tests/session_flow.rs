use chrono::{DateTime, Duration, TimeZone, Utc};
use nudge_core::{
    DayBoundary, EffortLevel, RecurrenceUnit, ScriptedRandom, SeededRandom, SessionEngine, SessionState, Task,
    TaskRepository, is_available, next_available_date, set_completion,
};
use std::collections::HashSet;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn low(id: &str) -> Task {
    Task::new(id, format!("task {id}"), EffortLevel::Low)
}

fn repo(tasks: Vec<Task>) -> TaskRepository {
    TaskRepository::from_tasks(tasks, DayBoundary::utc())
}

fn sample_tasks(b: &DayBoundary) -> Vec<Task> {
    let done_at = at(2024, 1, 31, 22, 30);
    let mut out = vec![low("open")];
    for unit in RecurrenceUnit::ALL {
        for interval in [1, 2, 13] {
            let t = low("x").with_recurrence(unit, interval);
            out.push(set_completion(t, true, done_at, b));
        }
    }
    out
}

/// Availability never regresses as time moves forward.
#[test]
fn availability_is_monotonic_in_time() {
    let b = DayBoundary::from_name("Europe/Berlin").unwrap();
    let start = at(2024, 1, 31, 0, 0);
    for task in sample_tasks(&b) {
        let mut was_available = false;
        for step in 0..(24 * 800) {
            let now = start + Duration::hours(step);
            let avail = is_available(&task, now);
            assert!(!(was_available && !avail), "regressed for {:?} at {now}", task.recurrence_unit);
            was_available = avail;
        }
    }
}

#[test]
fn completed_one_time_task_never_returns() {
    let b = DayBoundary::utc();
    let t = set_completion(low("once"), true, at(2024, 1, 1, 0, 0), &b);
    for days in (0..3650).step_by(97) {
        assert!(!is_available(&t, at(2024, 1, 1, 0, 0) + Duration::days(days)));
    }
}

#[test]
fn uncompleting_clears_completion_fields() {
    let b = DayBoundary::utc();
    for unit in RecurrenceUnit::ALL {
        let t = low("r").with_recurrence(unit, 2);
        let back = set_completion(set_completion(t, true, at(2024, 5, 5, 5, 5), &b), false, at(2024, 5, 6, 0, 0), &b);
        assert!(!back.is_completed);
        assert!(back.last_completed_at.is_none());
        assert!(back.next_available_at.is_none());
    }
}

#[test]
fn daily_task_scenario() {
    let b = DayBoundary::utc();
    let t = low("daily").with_recurrence(RecurrenceUnit::Days, 1);
    let done = set_completion(t, true, at(2024, 1, 1, 10, 0), &b);

    assert_eq!(done.next_available_at, Some(at(2024, 1, 2, 0, 0)));
    assert!(!is_available(&done, at(2024, 1, 1, 23, 0)));
    assert!(is_available(&done, at(2024, 1, 2, 0, 1)));
}

#[test]
fn monthly_rollover_from_jan_31_is_feb_29() {
    let b = DayBoundary::utc();
    let mut t = low("monthly").with_recurrence(RecurrenceUnit::Months, 1);
    t.is_completed = true;
    t.last_completed_at = Some(at(2024, 1, 31, 0, 0));
    assert_eq!(next_available_date(&t, &b), Some(at(2024, 2, 29, 0, 0)));
}

#[test]
fn scripted_random_picks_by_index() {
    let now = at(2024, 6, 1, 9, 0);
    let r = repo(vec![low("a"), low("b")]);

    let mut first = SessionEngine::new(ScriptedRandom::constant(0.1));
    assert_eq!(first.select_level(&r, EffortLevel::Low, now), Some("a"));

    let mut last = SessionEngine::new(ScriptedRandom::constant(0.9));
    assert_eq!(last.select_level(&r, EffortLevel::Low, now), Some("b"));

    // Only the unseen one is left, whatever the sample.
    assert_eq!(last.refresh_task(&r, now), Some("a"));
    assert_eq!(first.refresh_task(&r, now), Some("b"));
}

#[test]
fn session_shows_each_task_once_then_exhausts() {
    let now = at(2024, 6, 1, 9, 0);
    let n = 7;
    let tasks: Vec<Task> = (0..n).map(|i| low(&format!("t{i}"))).collect();
    let r = repo(tasks);

    let mut s = SessionEngine::new(SeededRandom::new(7));
    let mut shown = HashSet::new();
    shown.insert(s.select_level(&r, EffortLevel::Low, now).unwrap().to_string());
    for _ in 1..n {
        let id = s.refresh_task(&r, now).expect("unseen task left").to_string();
        assert!(shown.insert(id), "task repeated within a session");
    }
    assert_eq!(shown.len(), n);

    assert!(s.refresh_task(&r, now).is_none());
    assert_eq!(s.state(), &SessionState::Exhausted);

    // Asking again stays exhausted rather than cycling.
    assert!(s.refresh_task(&r, now).is_none());
    assert!(s.is_exhausted());
}

#[test]
fn reset_after_exhaustion_presents_again() {
    let now = at(2024, 6, 1, 9, 0);
    let r = repo(vec![low("a"), low("b")]);
    let mut s = SessionEngine::new(ScriptedRandom::constant(0.0));

    s.select_level(&r, EffortLevel::Low, now);
    s.refresh_task(&r, now);
    s.refresh_task(&r, now);
    assert!(s.is_exhausted());

    assert!(s.reset_level(&r, now).is_some());
    assert!(matches!(s.state(), SessionState::Presenting { .. }));
    assert_eq!(s.seen_count(), 1);
    assert_eq!(s.selected_level(), Some(EffortLevel::Low));
}

#[test]
fn mark_done_reports_level_cleared() {
    let now = at(2024, 6, 1, 9, 0);
    let mut r = repo(vec![low("a"), low("b"), Task::new("h", "hard", EffortLevel::High)]);
    let mut s = SessionEngine::new(ScriptedRandom::constant(0.0));

    s.select_level(&r, EffortLevel::Low, now);
    let out = s.mark_done(&mut r, now);
    assert!(!out.level_cleared);
    assert_eq!(s.state(), &SessionState::Idle);
    assert!(r.get("a").unwrap().is_completed);

    s.select_level(&r, EffortLevel::Low, now);
    assert_eq!(s.current_task_id(), Some("b"));
    let out = s.mark_done(&mut r, now);
    assert!(out.level_cleared);
    assert_eq!(s.state(), &SessionState::Cleared);

    // Nothing left to pick at that level.
    assert!(s.select_level(&r, EffortLevel::Low, now).is_none());
    assert!(!r.get("h").unwrap().is_completed);
}

#[test]
fn recurring_task_comes_back_after_refresh_sweep() {
    let day1 = at(2024, 6, 1, 9, 0);
    let mut r = repo(vec![low("daily").with_recurrence(RecurrenceUnit::Days, 1)]);
    let mut s = SessionEngine::new(ScriptedRandom::constant(0.0));

    s.select_level(&r, EffortLevel::Low, day1);
    assert!(s.mark_done(&mut r, day1).level_cleared);

    let day2 = at(2024, 6, 2, 7, 0);
    assert_eq!(r.refresh_recurring(day2), 1);
    let t = r.get("daily").unwrap();
    assert!(!t.is_completed);
    assert!(t.last_completed_at.is_none());

    s.back_to_selection();
    assert_eq!(s.select_level(&r, EffortLevel::Low, day2), Some("daily"));
}
