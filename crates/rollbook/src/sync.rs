//! Name sync for historical attendance files.
//!
//! Attendance files record status as it was on the day, but names are display
//! metadata that can be corrected later. [`sync_names`] is the explicit repair
//! pass: it rewrites only the name column, only for ids still on the roster,
//! and only touches files whose text actually changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::storage::layout::{format_row, LineRole, RowFields, RowSection};
use crate::storage::AttendanceLog;
use crate::student::StudentId;

/// Result of resyncing one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resync {
    /// Every row already matches; the file should be left alone.
    Unchanged,
    /// At least one row differs; the new full text.
    Rewritten(String),
}

/// Outcome of a sync run over the attendance directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Attendance files found.
    pub scanned: usize,
    /// Files rewritten.
    pub updated: usize,
    /// Files that could not be read or written, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl SyncReport {
    /// Whether there was nothing to scan.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scanned == 0
    }
}

/// Rebuild the row section of `content` with current names.
///
/// Only rows whose id is in `names` are rebuilt. Rows with an unknown or
/// non-numeric id, rows that would not read back with the same name and
/// status, and every line outside the row section pass through untouched.
#[must_use]
pub fn resync_text(content: &str, names: &HashMap<StudentId, String>) -> Resync {
    let mut section = RowSection::default();
    let mut changed = false;
    let mut lines = Vec::new();

    for line in content.lines() {
        if section.classify(line) == LineRole::Framing {
            lines.push(line.to_string());
            continue;
        }

        let fields = RowFields::split(line);
        let Some(id) = fields.student_id() else {
            lines.push(line.to_string());
            continue;
        };

        let Some(name) = names.get(&id) else {
            lines.push(line.to_string());
            continue;
        };

        let rebuilt = format_row(id, name, fields.status);
        if rebuilt == line || !reads_back_as(&rebuilt, name, fields.status) {
            if rebuilt != line {
                warn!("Leaving row for student {} as written: it does not fit the layout", id);
            }
            lines.push(line.to_string());
            continue;
        }
        changed = true;
        lines.push(rebuilt);
    }

    if !changed {
        return Resync::Unchanged;
    }

    let mut text = lines.join("\n");
    text.push('\n');
    Resync::Rewritten(text)
}

/// Whether `row` splits back into exactly `name` and `status`.
fn reads_back_as(row: &str, name: &str, status: &str) -> bool {
    if status.is_empty() || status.contains(char::is_whitespace) {
        return false;
    }
    let fields = RowFields::split(row);
    fields.name == name && fields.status == status
}

/// Resync one file in place. Returns whether it was rewritten.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn sync_file(path: &Path, names: &HashMap<StudentId, String>) -> Result<bool> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        Error::AttendanceRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    match resync_text(&content, names) {
        Resync::Unchanged => {
            debug!("{} already up to date", path.display());
            Ok(false)
        }
        Resync::Rewritten(text) => {
            std::fs::write(path, text).map_err(|source| Error::AttendanceWrite {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Synced names in {}", path.display());
            Ok(true)
        }
    }
}

/// Resync every attendance file in `log` against `names`.
///
/// A file that fails to read or write is recorded in the report and the
/// remaining files are still processed.
///
/// # Errors
///
/// Returns an error only if the attendance directory cannot be listed.
pub fn sync_names(log: &AttendanceLog, names: &HashMap<StudentId, String>) -> Result<SyncReport> {
    let files = log.files()?;
    let mut report = SyncReport {
        scanned: files.len(),
        ..SyncReport::default()
    };

    for path in files {
        match sync_file(&path, names) {
            Ok(true) => report.updated += 1,
            Ok(false) => {}
            Err(e) => {
                error!("Name sync failed for {}: {}", path.display(), e);
                report.failed.push((path, e.to_string()));
            }
        }
    }

    info!(
        "Synced names in {}/{} attendance files",
        report.updated, report.scanned
    );
    Ok(report)
}
