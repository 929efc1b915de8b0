//! TaskRepository: the in-memory task collection and its mutations.
//!
//! Ownership + persistence live outside: the caller loads a `Vec<Task>` from a
//! `TaskStore`, mutates it through this type, and saves `all()` back.
//!
//! Operations on an unknown id are no-ops. Callers pass ids from a prior read
//! and there is a single owner, so a missing id is a stale reference, not a fault.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::availability::is_available;
use crate::completion::{apply_patch, recompute_next_available, set_completion};
use crate::task::{Task, TaskPatch, ValidDraft};
use crate::time::DayBoundary;

/// Storage seam: the whole list is read at startup and written after every mutation.
pub trait TaskStore {
    fn load_all(&self) -> Result<Vec<Task>>;
    fn save_all(&mut self, tasks: &[Task]) -> Result<()>;
}

/// Store that keeps the list in memory. Useful for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    saves: usize,
}

impl MemoryStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, saves: 0 }
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl TaskStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save_all(&mut self, tasks: &[Task]) -> Result<()> {
        self.tasks = tasks.to_vec();
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct TaskRepository {
    tasks: Vec<Task>,
    boundary: DayBoundary,
}

impl TaskRepository {
    pub fn new(boundary: DayBoundary) -> Self {
        Self {
            tasks: Vec::new(),
            boundary,
        }
    }

    /// Adopt a loaded list, bringing older records up to the cached-reopen model.
    pub fn from_tasks(tasks: Vec<Task>, boundary: DayBoundary) -> Self {
        let mut repo = Self { tasks, boundary };
        let fixed = repo.backfill();
        if fixed > 0 {
            info!(fixed, "backfilled next_available_at on loaded tasks");
        }
        repo
    }

    pub fn load(store: &impl TaskStore, boundary: DayBoundary) -> Result<Self> {
        Ok(Self::from_tasks(store.load_all()?, boundary))
    }

    pub fn save(&self, store: &mut impl TaskStore) -> Result<()> {
        store.save_all(&self.tasks)
    }

    pub fn boundary(&self) -> &DayBoundary {
        &self.boundary
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Case-insensitive title lookup (used for import dedupe).
    pub fn find_by_title(&self, title: &str) -> Option<&Task> {
        let needle = title.trim().to_lowercase();
        self.tasks.iter().find(|t| t.title.to_lowercase() == needle)
    }

    /// Create a task from a validated draft. Newest tasks come first.
    pub fn add(&mut self, draft: ValidDraft) -> Task {
        let task = draft.into_task(Uuid::new_v4().to_string());
        debug!(id = %task.id, title = %task.title, level = %task.level, "task added");
        self.tasks.insert(0, task.clone());
        task
    }

    /// Edit title/level/recurrence. Returns the updated task, or `None` for an unknown id.
    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> Option<&Task> {
        let idx = self.position(id)?;
        let updated = apply_patch(self.tasks[idx].clone(), patch, &self.boundary);
        self.tasks[idx] = updated;
        debug!(id, "task updated");
        Some(&self.tasks[idx])
    }

    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let idx = self.position(id)?;
        debug!(id, "task deleted");
        Some(self.tasks.remove(idx))
    }

    pub fn set_completion(&mut self, id: &str, is_completed: bool, now: DateTime<Utc>) -> Option<&Task> {
        let idx = self.position(id)?;
        let updated = set_completion(self.tasks[idx].clone(), is_completed, now, &self.boundary);
        self.tasks[idx] = updated;
        debug!(id, is_completed, "completion changed");
        Some(&self.tasks[idx])
    }

    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<&Task> {
        self.set_completion(id, true, now)
    }

    /// Flip completion, as the catalog checkbox does.
    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Option<&Task> {
        let target = !self.get(id)?.is_completed;
        self.set_completion(id, target, now)
    }

    /// Reopen every completed recurring task whose reopen instant has passed.
    ///
    /// Returns how many tasks were reopened.
    pub fn refresh_recurring(&mut self, now: DateTime<Utc>) -> usize {
        let mut reopened = 0;
        for task in self.tasks.iter_mut() {
            if task.is_completed && !task.is_one_time() && is_available(task, now) {
                task.is_completed = false;
                task.last_completed_at = None;
                task.next_available_at = None;
                reopened += 1;
            }
        }
        if reopened > 0 {
            info!(reopened, "recurring tasks reopened");
        }
        reopened
    }

    fn position(&self, id: &str) -> Option<usize> {
        let idx = self.tasks.iter().position(|t| t.id == id);
        if idx.is_none() {
            debug!(id, "unknown task id, ignoring");
        }
        idx
    }

    /// Fill a missing cache from `last_completed_at`, and drop caches that
    /// should not exist (incomplete or one-time tasks).
    fn backfill(&mut self) -> usize {
        let boundary = self.boundary;
        let mut fixed = 0;
        for task in self.tasks.iter_mut() {
            let needs_fill = task.is_completed
                && !task.is_one_time()
                && task.last_completed_at.is_some()
                && task.next_available_at.is_none();
            let stale = task.next_available_at.is_some() && (!task.is_completed || task.is_one_time());
            if needs_fill || stale {
                *task = recompute_next_available(task.clone(), &boundary);
                fixed += 1;
            }
            if task.recurrence_interval == 0 {
                task.recurrence_interval = 1;
            }
        }
        fixed
    }
}
