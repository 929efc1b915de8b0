//! Read task lists from CSV.
//!
//! Expected header (any order, any case, extra columns ignored):
//! title,effort,interval,unit

use anyhow::{Context, Result, bail};
use nudge_core::{EffortLevel, RecurrenceUnit, TaskDraft};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::{CsvTaskRow, ProcessedImport};

pub const REQUIRED_HEADERS: [&str; 4] = ["title", "effort", "interval", "unit"];

/// Column index per required header, or `None` when one is missing.
pub fn header_indices(headers: &csv::StringRecord) -> Option<[usize; 4]> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut out = [0usize; 4];
    for (slot, name) in out.iter_mut().zip(REQUIRED_HEADERS) {
        *slot = normalized.iter().position(|h| h == name)?;
    }
    Some(out)
}

/// Parse rows from any reader. Fails only on a malformed file or missing header.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<CsvTaskRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let Some([title, effort, interval, unit]) = header_indices(&headers) else {
        bail!(
            "CSV header must contain: {} (found: {})",
            REQUIRED_HEADERS.join(", "),
            headers.iter().collect::<Vec<_>>().join(", ")
        );
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(CsvTaskRow {
            title: field(title),
            effort: field(effort),
            interval: field(interval),
            unit: field(unit),
        });
    }
    Ok(rows)
}

pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<CsvTaskRow>> {
    let file = std::fs::File::open(path.as_ref()).with_context(|| format!("opening {}", path.as_ref().display()))?;
    read_rows(file).with_context(|| format!("parsing {}", path.as_ref().display()))
}

/// Map rows to drafts, dropping incomplete rows and titles already present.
///
/// `existing_titles` is matched case-insensitively; titles seen earlier in the
/// same file count as existing too.
pub fn process_rows<'a>(rows: &[CsvTaskRow], existing_titles: impl IntoIterator<Item = &'a str>) -> ProcessedImport {
    let mut known: HashSet<String> = existing_titles.into_iter().map(|t| t.trim().to_lowercase()).collect();
    let mut out = ProcessedImport::default();

    for row in rows {
        let title = row.title.trim();
        if title.is_empty() || row.effort.trim().is_empty() || row.interval.trim().is_empty() || row.unit.trim().is_empty()
        {
            out.rejected += 1;
            continue;
        }

        if known.contains(&title.to_lowercase()) {
            debug!(title, "duplicate title, skipping");
            out.skipped_duplicates += 1;
            continue;
        }

        let level = EffortLevel::from_free_text(&row.effort);
        let unit = RecurrenceUnit::from_free_text(&row.unit);
        let interval = leading_integer(&row.interval);

        let draft = match (unit, interval) {
            (RecurrenceUnit::None, _) => TaskDraft::new(title, level),
            (_, Some(n)) if n >= 1 && n <= u32::MAX as i64 => TaskDraft::new(title, level).every(n as u32, unit),
            _ => {
                debug!(title, interval = %row.interval, "unusable interval, rejecting");
                out.rejected += 1;
                continue;
            }
        };

        known.insert(title.to_lowercase());
        out.drafts.push(draft);
    }

    out
}

/// Integer at the start of `text`, ignoring whatever follows: "3 days" is 3,
/// "2.5" is 2, "abc" is nothing.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
