//! Typed errors for the few fallible edges of the engine.

use thiserror::Error;

use crate::task::RecurrenceUnit;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("recurrence interval must be at least 1 (got {interval} {unit})")]
    InvalidInterval { unit: RecurrenceUnit, interval: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceParseError {
    #[error("could not read recurrence '{0}' (try: 3d, 2 weeks, every month, none)")]
    Unrecognized(String),

    #[error("recurrence interval must be at least 1")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timezone: {0}")]
pub struct TimezoneError(pub String);
