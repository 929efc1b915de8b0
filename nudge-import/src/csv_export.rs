//! Write task lists back out in the import format.

use anyhow::{Context, Result, bail};
use nudge_core::Task;
use std::io::Write;
use std::path::Path;

use crate::types::CsvTaskRow;

pub fn to_row(task: &Task) -> CsvTaskRow {
    CsvTaskRow {
        title: task.title.clone(),
        effort: task.level.as_str().to_string(),
        interval: task.recurrence_interval.max(1).to_string(),
        unit: task.recurrence_unit.as_str().to_string(),
    }
}

/// Serialize tasks as `title,effort,interval,unit`. An empty list is an error.
pub fn write_tasks<W: Write>(writer: W, tasks: &[Task]) -> Result<usize> {
    if tasks.is_empty() {
        bail!("no tasks to export");
    }
    let mut wtr = csv::Writer::from_writer(writer);
    for task in tasks {
        wtr.serialize(to_row(task))?;
    }
    wtr.flush()?;
    Ok(tasks.len())
}

pub fn export_to_path(path: impl AsRef<Path>, tasks: &[Task]) -> Result<usize> {
    let file = std::fs::File::create(path.as_ref()).with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_tasks(file, tasks).with_context(|| format!("writing {}", path.as_ref().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_core::{EffortLevel, RecurrenceUnit};

    #[test]
    fn writes_header_and_lowercase_fields() {
        let tasks = vec![
            Task::new("1", "Water plants", EffortLevel::Low).with_recurrence(RecurrenceUnit::Days, 3),
            Task::new("2", "Taxes, finally", EffortLevel::High),
        ];
        let mut buf = Vec::new();
        assert_eq!(write_tasks(&mut buf, &tasks).unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,effort,interval,unit");
        assert_eq!(lines[1], "Water plants,low,3,days");
        assert_eq!(lines[2], "\"Taxes, finally\",high,1,none");
    }

    #[test]
    fn empty_export_fails() {
        let mut buf = Vec::new();
        assert!(write_tasks(&mut buf, &[]).is_err());
    }
}
