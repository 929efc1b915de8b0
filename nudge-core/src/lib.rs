//! nudge-core: task availability, recurrence and selection engine for the Nudge tracker
//!
//! Everything here is synchronous and pure over a task list. Wall-clock time is
//! always passed in as `now`; randomness comes in through `RandomSource`.

pub mod availability;
pub mod calendar;
pub mod completion;
pub mod error;
pub mod random;
pub mod recurrence;
pub mod repository;
pub mod session;
pub mod stats;
pub mod task;
pub mod time;

pub use availability::{count_available, is_archived, is_available, tasks_for_level};
pub use calendar::add_interval;
pub use completion::{apply_patch, recompute_next_available, set_completion};
pub use error::{DraftError, RecurrenceParseError, TimezoneError};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom, pick_index};
pub use recurrence::{Recurrence, next_available_date};
pub use repository::{MemoryStore, TaskRepository, TaskStore};
pub use session::{MarkDoneOutcome, SessionEngine, SessionState};
pub use stats::{
    AvailabilitySummary, CatalogStats, CatalogView, LevelHealth, availability_summary, catalog_stats, catalog_view,
};
pub use task::{EffortLevel, RecurrenceUnit, Task, TaskDraft, TaskPatch, ValidDraft};
pub use time::{DayBoundary, parse_local_to_utc};
