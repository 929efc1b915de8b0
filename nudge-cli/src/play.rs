//! Interactive session: one task at a time at the chosen effort level.

use anyhow::Result;
use chrono::{DateTime, Utc};
use nudge_core::{
    EffortLevel, RandomSource, SessionEngine, SessionState, Task, TaskRepository, TaskStore, availability_summary,
};
use std::io::{BufRead, Write};

/// How a play session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEnd {
    NothingAvailable,
    Done { level_cleared: bool, all_clear: bool },
    Deleted,
    Quit,
}

pub struct Play<'a, R: RandomSource, S: TaskStore> {
    pub repo: &'a mut TaskRepository,
    pub store: &'a mut S,
    pub session: SessionEngine<R>,
    pub clock: &'a dyn Fn() -> DateTime<Utc>,
    /// Ask on the same input before deleting the presented task.
    pub confirm_delete: bool,
}

impl<R: RandomSource, S: TaskStore> Play<'_, R, S> {
    pub fn run(&mut self, level: EffortLevel, input: &mut impl BufRead, out: &mut impl Write) -> Result<PlayEnd> {
        if self.session.select_level(self.repo, level, (self.clock)()).is_none() {
            writeln!(out, "Nothing available at {level} effort right now.")?;
            self.print_next_refresh(out)?;
            return Ok(PlayEnd::NothingAvailable);
        }

        loop {
            match self.session.state().clone() {
                SessionState::Presenting { .. } => {
                    if let Some(task) = self.session.current_task(self.repo) {
                        writeln!(out, "\n→ {}", describe(task))?;
                    }
                    write!(out, "[d]one  [n]ext  [x] delete  [q]uit > ")?;
                }
                SessionState::Exhausted => {
                    writeln!(out, "\nYou've seen every {level} task for now.")?;
                    write!(out, "[r]un the list again  [q]uit > ")?;
                }
                SessionState::Idle | SessionState::Cleared => return Ok(PlayEnd::Quit),
            }
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(PlayEnd::Quit);
            }

            let now = (self.clock)();
            match line.trim().to_lowercase().as_str() {
                "n" | "next" => {
                    self.session.refresh_task(self.repo, now);
                }
                "r" | "reset" => {
                    if self.session.reset_level(self.repo, now).is_none() {
                        writeln!(out, "Nothing left at {level} effort.")?;
                        return Ok(PlayEnd::NothingAvailable);
                    }
                }
                "d" | "done" => {
                    let outcome = self.session.mark_done(self.repo, now);
                    self.repo.save(self.store)?;
                    let summary = availability_summary(self.repo.all(), now, self.repo.boundary());
                    if summary.all_clear() {
                        writeln!(out, "Every task is done. Total victory!")?;
                        self.print_next_refresh(out)?;
                    } else if outcome.level_cleared {
                        writeln!(out, "That was the last {level} task. Level cleared!")?;
                    } else {
                        writeln!(out, "Done. Nice work.")?;
                    }
                    return Ok(PlayEnd::Done {
                        level_cleared: outcome.level_cleared,
                        all_clear: summary.all_clear(),
                    });
                }
                "x" | "delete" => {
                    if let Some(id) = self.session.current_task_id().map(str::to_string) {
                        if self.confirm_delete && !self.confirm(&id, input, out)? {
                            writeln!(out, "Kept.")?;
                            continue;
                        }
                        self.repo.delete(&id);
                        self.session.forget(&id);
                        self.repo.save(self.store)?;
                        writeln!(out, "Deleted.")?;
                        return Ok(PlayEnd::Deleted);
                    }
                }
                "q" | "quit" => return Ok(PlayEnd::Quit),
                other => writeln!(out, "Unknown choice: {other}")?,
            }
        }
    }

    fn confirm(&self, id: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
        let title = self.repo.get(id).map(|t| t.title.as_str()).unwrap_or_default();
        write!(out, "Delete '{title}'? [y/N] ")?;
        out.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn print_next_refresh(&self, out: &mut impl Write) -> Result<()> {
        let summary = availability_summary(self.repo.all(), (self.clock)(), self.repo.boundary());
        if let Some(days) = summary.next_refresh_days {
            let unit = if days == 1 { "day" } else { "days" };
            writeln!(out, "Recurring tasks return in {days} {unit}.")?;
        }
        Ok(())
    }
}

pub fn describe(task: &Task) -> String {
    if task.is_one_time() {
        format!("{} ({} effort, one-time)", task.title, task.level)
    } else {
        format!(
            "{} ({} effort, every {} {})",
            task.title, task.level, task.recurrence_interval, task.recurrence_unit
        )
    }
}
