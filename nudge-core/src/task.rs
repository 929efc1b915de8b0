//! Task model for the nudge availability engine.
//!
//! A task is the only persistent entity. Storage is an outer layer; this type
//! stays small + serializable so any key-value backend can hold a `Vec<Task>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DraftError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl EffortLevel {
    pub const ALL: [EffortLevel; 3] = [EffortLevel::Low, EffortLevel::Medium, EffortLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffortLevel::Low => "low",
            EffortLevel::Medium => "medium",
            EffortLevel::High => "high",
        }
    }

    /// Lenient mapping of free text ("High Effort", "MEDIUM", "low-ish").
    ///
    /// "high" wins over "medium"; anything else falls back to `Low`.
    pub fn from_free_text(s: &str) -> Self {
        let s = s.to_lowercase();
        if s.contains("high") {
            EffortLevel::High
        } else if s.contains("medium") {
            EffortLevel::Medium
        } else {
            EffortLevel::Low
        }
    }
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffortLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Ok(EffortLevel::Low),
            "medium" | "med" | "m" => Ok(EffortLevel::Medium),
            "high" | "h" => Ok(EffortLevel::High),
            other => Err(format!("unknown effort level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    #[default]
    None,
    Days,
    Weeks,
    Months,
    Years,
}

impl RecurrenceUnit {
    pub const ALL: [RecurrenceUnit; 5] = [
        RecurrenceUnit::None,
        RecurrenceUnit::Days,
        RecurrenceUnit::Weeks,
        RecurrenceUnit::Months,
        RecurrenceUnit::Years,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceUnit::None => "none",
            RecurrenceUnit::Days => "days",
            RecurrenceUnit::Weeks => "weeks",
            RecurrenceUnit::Months => "months",
            RecurrenceUnit::Years => "years",
        }
    }

    pub fn is_recurring(&self) -> bool {
        *self != RecurrenceUnit::None
    }

    /// Exact, case-insensitive unit name. Unknown text maps to `None` (one-time).
    pub fn from_free_text(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "days" => RecurrenceUnit::Days,
            "weeks" => RecurrenceUnit::Weeks,
            "months" => RecurrenceUnit::Months,
            "years" => RecurrenceUnit::Years,
            _ => RecurrenceUnit::None,
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_interval() -> u32 {
    1
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub level: EffortLevel,

    #[serde(default)]
    pub is_completed: bool,

    /// Created by the user rather than seeded.
    #[serde(default)]
    pub is_custom: bool,

    #[serde(default)]
    pub recurrence_unit: RecurrenceUnit,

    /// Only meaningful when `recurrence_unit` is not `None`. Always >= 1.
    #[serde(default = "default_interval")]
    pub recurrence_interval: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<DateTime<Utc>>,

    /// Cached reopen instant, computed when the task is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_available_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, level: EffortLevel) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            is_completed: false,
            is_custom: false,
            recurrence_unit: RecurrenceUnit::None,
            recurrence_interval: 1,
            last_completed_at: None,
            next_available_at: None,
        }
    }

    pub fn with_recurrence(mut self, unit: RecurrenceUnit, interval: u32) -> Self {
        self.recurrence_unit = unit;
        self.recurrence_interval = interval.max(1);
        self
    }

    pub fn is_one_time(&self) -> bool {
        !self.recurrence_unit.is_recurring()
    }
}

/// Unvalidated input from a form or an import row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub level: EffortLevel,
    #[serde(default)]
    pub recurrence_unit: RecurrenceUnit,
    #[serde(default)]
    pub recurrence_interval: Option<u32>,
    #[serde(default)]
    pub is_custom: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, level: EffortLevel) -> Self {
        Self {
            title: title.into(),
            level,
            recurrence_unit: RecurrenceUnit::None,
            recurrence_interval: None,
            is_custom: false,
        }
    }

    pub fn every(mut self, interval: u32, unit: RecurrenceUnit) -> Self {
        self.recurrence_interval = Some(interval);
        self.recurrence_unit = unit;
        self
    }

    pub fn custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    /// Check the creation-boundary rules and normalize the draft.
    pub fn validate(self) -> Result<ValidDraft, DraftError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }

        let interval = match (self.recurrence_unit, self.recurrence_interval) {
            (RecurrenceUnit::None, _) => 1,
            (_, None) => 1,
            (unit, Some(0)) => return Err(DraftError::InvalidInterval { unit, interval: 0 }),
            (_, Some(n)) => n,
        };

        Ok(ValidDraft {
            title,
            level: self.level,
            recurrence_unit: self.recurrence_unit,
            recurrence_interval: interval,
            is_custom: self.is_custom,
        })
    }
}

/// A draft that passed `TaskDraft::validate`. Only these reach the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub(crate) title: String,
    pub(crate) level: EffortLevel,
    pub(crate) recurrence_unit: RecurrenceUnit,
    pub(crate) recurrence_interval: u32,
    pub(crate) is_custom: bool,
}

impl ValidDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            level: self.level,
            is_completed: false,
            is_custom: self.is_custom,
            recurrence_unit: self.recurrence_unit,
            recurrence_interval: self.recurrence_interval,
            last_completed_at: None,
            next_available_at: None,
        }
    }
}

/// Partial edit of a task's settings. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub level: Option<EffortLevel>,
    pub recurrence_unit: Option<RecurrenceUnit>,
    pub recurrence_interval: Option<u32>,
}

impl TaskPatch {
    pub fn touches_recurrence(&self) -> bool {
        self.recurrence_unit.is_some() || self.recurrence_interval.is_some()
    }
}
