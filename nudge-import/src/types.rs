use nudge_core::TaskDraft;
use serde::{Deserialize, Serialize};

/// One raw CSV row. All fields are free text until mapped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CsvTaskRow {
    pub title: String,
    pub effort: String,
    pub interval: String,
    pub unit: String,
}

/// Drafts ready for `TaskRepository::add`, plus what was left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessedImport {
    pub drafts: Vec<TaskDraft>,
    /// Rows whose title already exists (case-insensitive).
    pub skipped_duplicates: usize,
    /// Rows missing a field or carrying an unusable interval.
    pub rejected: usize,
}

impl ProcessedImport {
    pub fn count(&self) -> usize {
        self.drafts.len()
    }
}
