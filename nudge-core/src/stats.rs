//! Aggregates for the level picker, the catalog and its report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::availability::{is_archived, is_available};
use crate::task::{EffortLevel, RecurrenceUnit, Task};
use crate::time::DayBoundary;

/// What the level picker needs: how many tasks are up per level, and when the next one returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySummary {
    pub counts: BTreeMap<EffortLevel, usize>,
    pub total_available: usize,
    /// Calendar days until the soonest cached reopen, at least 1.
    /// `None` when no completed task is waiting to reopen.
    pub next_refresh_days: Option<i64>,
}

impl AvailabilitySummary {
    pub fn count(&self, level: EffortLevel) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    /// Nothing at any level can be picked right now.
    pub fn all_clear(&self) -> bool {
        self.total_available == 0
    }
}

pub fn availability_summary(tasks: &[Task], now: DateTime<Utc>, boundary: &DayBoundary) -> AvailabilitySummary {
    let mut counts: BTreeMap<EffortLevel, usize> = EffortLevel::ALL.iter().map(|l| (*l, 0)).collect();
    let mut total = 0;
    let mut min_days: Option<i64> = None;

    for task in tasks {
        if is_available(task, now) {
            *counts.entry(task.level).or_default() += 1;
            total += 1;
        }
        if let (true, Some(next)) = (task.is_completed, task.next_available_at) {
            let diff = boundary.calendar_days_between(now, next);
            min_days = Some(min_days.map_or(diff, |m| m.min(diff)));
        }
    }

    AvailabilitySummary {
        counts,
        total_available: total,
        next_refresh_days: min_days.map(|d| d.max(1)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelHealth {
    pub done: usize,
    pub left: usize,
}

impl LevelHealth {
    /// Rounded completion percentage; 0 for an empty level.
    pub fn percent_done(&self) -> u32 {
        let total = self.done + self.left;
        if total == 0 {
            return 0;
        }
        ((self.done as f64 / total as f64) * 100.0).round() as u32
    }
}

/// Catalog report: completion health per level and today's activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub health: BTreeMap<EffortLevel, LevelHealth>,
    pub today_by_level: BTreeMap<EffortLevel, usize>,
    pub today_by_unit: BTreeMap<RecurrenceUnit, usize>,
    pub has_activity_today: bool,
    pub registered_units: BTreeSet<RecurrenceUnit>,
}

pub fn catalog_stats(tasks: &[Task], now: DateTime<Utc>, boundary: &DayBoundary) -> CatalogStats {
    let mut health: BTreeMap<EffortLevel, LevelHealth> =
        EffortLevel::ALL.iter().map(|l| (*l, LevelHealth::default())).collect();
    let mut today_by_level: BTreeMap<EffortLevel, usize> = EffortLevel::ALL.iter().map(|l| (*l, 0)).collect();
    let mut today_by_unit: BTreeMap<RecurrenceUnit, usize> = RecurrenceUnit::ALL.iter().map(|u| (*u, 0)).collect();
    let mut registered_units = BTreeSet::new();
    let mut has_activity_today = false;
    let today = boundary.local_date(now);

    for task in tasks {
        registered_units.insert(task.recurrence_unit);

        let done_today = task.is_completed
            && task
                .last_completed_at
                .is_some_and(|at| boundary.local_date(at) == today);
        if done_today {
            *today_by_level.entry(task.level).or_default() += 1;
            *today_by_unit.entry(task.recurrence_unit).or_default() += 1;
            has_activity_today = true;
        }

        let h = health.entry(task.level).or_default();
        if task.is_completed {
            h.done += 1;
        } else {
            h.left += 1;
        }
    }

    CatalogStats {
        health,
        today_by_level,
        today_by_unit,
        has_activity_today,
        registered_units,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogView {
    /// Recurring tasks plus one-time tasks still to do.
    #[default]
    Tasks,
    /// Completed one-time tasks.
    Archive,
}

/// Tasks for a catalog tab: incomplete first, then by title.
pub fn catalog_view(tasks: &[Task], view: CatalogView) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| match view {
            CatalogView::Tasks => !is_archived(t),
            CatalogView::Archive => is_archived(t),
        })
        .collect();
    out.sort_by(|a, b| {
        a.is_completed
            .cmp(&b.is_completed)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    out
}
