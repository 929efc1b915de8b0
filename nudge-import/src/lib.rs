//! nudge-import: CSV bulk import/export of task drafts.

pub mod csv_export;
pub mod csv_import;
pub mod types;

use nudge_core::TaskRepository;
use tracing::{info, warn};

pub use csv_export::{export_to_path, write_tasks};
pub use csv_import::{process_rows, read_rows, read_rows_from_path};
pub use types::{CsvTaskRow, ProcessedImport};

/// Outcome of adding an import batch to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped_duplicates: usize,
    pub rejected: usize,
}

/// Dedupe `rows` against the repository and add what survives.
pub fn import_into(repo: &mut TaskRepository, rows: &[CsvTaskRow]) -> ImportSummary {
    let processed = {
        let titles = repo.all().iter().map(|t| t.title.as_str());
        process_rows(rows, titles)
    };

    let mut summary = ImportSummary {
        added: 0,
        skipped_duplicates: processed.skipped_duplicates,
        rejected: processed.rejected,
    };

    for draft in processed.drafts {
        match draft.custom().validate() {
            Ok(valid) => {
                repo.add(valid);
                summary.added += 1;
            }
            Err(e) => {
                warn!(error = %e, "import row failed validation");
                summary.rejected += 1;
            }
        }
    }

    info!(
        added = summary.added,
        skipped = summary.skipped_duplicates,
        rejected = summary.rejected,
        "import finished"
    );
    summary
}
