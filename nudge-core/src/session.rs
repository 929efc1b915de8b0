//! Session engine: pick a task at an effort level, offer alternatives, mark done.
//!
//! One browsing session per chosen level:
//!
//! ```text
//! Idle --select_level--> Presenting --refresh_task--> Presenting | Exhausted
//!                            |                                        |
//!                         mark_done --> Idle | Cleared          reset_level --> Presenting | Idle
//! ```
//!
//! The session holds ids, never task copies, so edits made through the
//! repository are visible on the next read.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::availability::{count_available, tasks_for_level};
use crate::random::{RandomSource, pick_index};
use crate::repository::TaskRepository;
use crate::task::{EffortLevel, Task};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No level chosen (or back at level selection).
    #[default]
    Idle,
    /// A task is on screen.
    Presenting { task_id: String },
    /// Every available task at the level was already shown this session.
    Exhausted,
    /// The last available task at the level was just completed.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkDoneOutcome {
    pub level_cleared: bool,
}

/// Session controller. Generic over the random source so picks can be scripted.
#[derive(Debug, Clone)]
pub struct SessionEngine<R: RandomSource> {
    rng: R,
    selected_level: Option<EffortLevel>,
    state: SessionState,
    seen: HashSet<String>,
}

impl<R: RandomSource> SessionEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            selected_level: None,
            state: SessionState::Idle,
            seen: HashSet::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected_level(&self) -> Option<EffortLevel> {
        self.selected_level
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == SessionState::Exhausted
    }

    pub fn current_task_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Presenting { task_id } => Some(task_id),
            _ => None,
        }
    }

    /// The task being presented, as currently stored.
    pub fn current_task<'a>(&self, repo: &'a TaskRepository) -> Option<&'a Task> {
        self.current_task_id().and_then(|id| repo.get(id))
    }

    /// Start a session at `level`. With nothing available this is a no-op.
    pub fn select_level(&mut self, repo: &TaskRepository, level: EffortLevel, now: DateTime<Utc>) -> Option<&str> {
        let picked = {
            let candidates = tasks_for_level(repo.all(), level, now);
            pick_index(&mut self.rng, candidates.len()).map(|i| candidates[i].id.clone())
        };
        let Some(id) = picked else {
            debug!(%level, "no available tasks, staying put");
            return None;
        };

        self.selected_level = Some(level);
        self.seen.clear();
        self.present(id);
        self.current_task_id()
    }

    /// "Something else": an unseen available task at the current level, or `Exhausted`.
    ///
    /// Never repeats a task within the session, even when seen tasks are
    /// still available; `reset_level` starts the list over.
    pub fn refresh_task(&mut self, repo: &TaskRepository, now: DateTime<Utc>) -> Option<&str> {
        let level = self.selected_level?;

        let picked = {
            let candidates: Vec<&Task> = tasks_for_level(repo.all(), level, now)
                .into_iter()
                .filter(|t| !self.seen.contains(&t.id))
                .collect();
            pick_index(&mut self.rng, candidates.len()).map(|i| candidates[i].id.clone())
        };

        match picked {
            Some(id) => {
                self.present(id);
                self.current_task_id()
            }
            None => {
                debug!(%level, seen = self.seen.len(), "level exhausted");
                self.state = SessionState::Exhausted;
                None
            }
        }
    }

    /// Run the same list again: forget what was seen and pick fresh.
    ///
    /// With nothing left at the level the session goes back to selection.
    pub fn reset_level(&mut self, repo: &TaskRepository, now: DateTime<Utc>) -> Option<&str> {
        let level = self.selected_level?;
        self.seen.clear();
        self.state = SessionState::Idle;
        if self.select_level(repo, level, now).is_none() {
            self.back_to_selection();
            return None;
        }
        self.current_task_id()
    }

    /// Complete the presented task and report whether its level is now empty.
    ///
    /// The caller persists the repository afterwards.
    pub fn mark_done(&mut self, repo: &mut TaskRepository, now: DateTime<Utc>) -> MarkDoneOutcome {
        let (Some(level), Some(id)) = (self.selected_level, self.current_task_id().map(str::to_string)) else {
            self.back_to_selection();
            return MarkDoneOutcome { level_cleared: false };
        };

        if repo.complete(&id, now).is_none() {
            self.back_to_selection();
            return MarkDoneOutcome { level_cleared: false };
        }

        let remaining = count_available(repo.all(), level, now);
        let level_cleared = remaining == 0;
        debug!(%level, remaining, level_cleared, "task marked done");

        if level_cleared {
            self.state = SessionState::Cleared;
            self.seen.clear();
        } else {
            self.back_to_selection();
        }
        MarkDoneOutcome { level_cleared }
    }

    /// Leave the level and return to `Idle`.
    pub fn back_to_selection(&mut self) {
        self.selected_level = None;
        self.state = SessionState::Idle;
        self.seen.clear();
    }

    /// Drop references to a deleted task. Deleting the presented task ends the session.
    pub fn forget(&mut self, task_id: &str) {
        self.seen.remove(task_id);
        if self.current_task_id() == Some(task_id) {
            self.back_to_selection();
        }
    }

    fn present(&mut self, id: String) {
        debug!(task_id = %id, "presenting task");
        self.seen.insert(id.clone());
        self.state = SessionState::Presenting { task_id: id };
    }
}
