//! Per-date attendance log files.
//!
//! Each marking session writes one `attendance_YYYYMMDD.txt` file holding a
//! fixed-width table of every student plus a summary footer. Files are
//! point-in-time snapshots: nothing here rewrites them when the roster changes.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::storage::layout::{column_header, format_row, separator, status_text, SECTION_MARKER};
use crate::student::StudentId;

/// Compact date format embedded in file names.
const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// One student's line in an attendance file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    /// Student id.
    pub id: StudentId,
    /// Student name at the time of marking.
    pub name: String,
    /// Whether the student was present.
    pub present: bool,
}

impl AttendanceRow {
    /// Create a row.
    #[must_use]
    pub fn new(id: StudentId, name: impl Into<String>, present: bool) -> Self {
        Self {
            id,
            name: name.into(),
            present,
        }
    }
}

/// Counts shown in an attendance file footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceSummary {
    /// Number of rows.
    pub total: usize,
    /// Rows marked present.
    pub present: usize,
    /// Rows marked absent.
    pub absent: usize,
}

impl AttendanceSummary {
    /// Summarize a set of rows.
    #[must_use]
    pub fn from_rows(rows: &[AttendanceRow]) -> Self {
        let total = rows.len();
        let present = rows.iter().filter(|r| r.present).count();
        Self {
            total,
            present,
            absent: total - present,
        }
    }

    /// Share of rows present, as a percentage. 0 when there are no rows.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 * 100.0 / self.total as f64
        }
    }
}

/// Render the full text of an attendance file.
#[must_use]
pub fn render_sheet(date: NaiveDate, rows: &[AttendanceRow]) -> String {
    let summary = AttendanceSummary::from_rows(rows);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Date: {}", date.format("%Y-%m-%d"));
    let _ = writeln!(out, "{}", column_header());
    let _ = writeln!(out, "{}", separator());
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row.id, &row.name, status_text(row.present)));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{SECTION_MARKER} Summary {SECTION_MARKER}");
    let _ = writeln!(out, "Total Students: {}", summary.total);
    let _ = writeln!(out, "Present: {}", summary.present);
    let _ = writeln!(out, "Absent: {}", summary.absent);
    let _ = writeln!(out, "Attendance: {:.2}%", summary.percentage());
    out
}

/// An attendance file found on disk with a readable date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    /// Date embedded in the file name.
    pub date: NaiveDate,
    /// Full path to the file.
    pub path: PathBuf,
    /// Last modification time.
    pub modified: SystemTime,
}

/// Directory of per-date attendance files.
#[derive(Debug, Clone)]
pub struct AttendanceLog {
    dir: PathBuf,
}

impl AttendanceLog {
    /// Use `dir` as the attendance directory. Nothing is created until a write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The attendance directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for `date`.
    #[must_use]
    pub fn file_name(date: NaiveDate) -> String {
        format!("attendance_{}.txt", date.format(FILE_DATE_FORMAT))
    }

    /// Path of the file for `date`.
    #[must_use]
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(Self::file_name(date))
    }

    /// Write the file for `date`, replacing any earlier file for that date.
    ///
    /// Creates the attendance directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write(&self, date: NaiveDate, rows: &[AttendanceRow]) -> Result<PathBuf> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.path_for(date);
        std::fs::write(&path, render_sheet(date, rows)).map_err(|source| {
            Error::AttendanceWrite {
                path: path.clone(),
                source,
            }
        })?;

        info!("Wrote attendance for {} ({} rows) to {}", date, rows.len(), path.display());
        Ok(path)
    }

    /// Every file that looks like an attendance file, whether or not its
    /// embedded date parses. A missing directory has no files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be listed.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Attendance directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.dir_error(source)),
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let path = entry.map_err(|source| self.dir_error(source))?.path();
            if path.is_file() && file_date_text(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn dir_error(&self, source: std::io::Error) -> Error {
        Error::DirectoryRead {
            path: self.dir.clone(),
            source,
        }
    }

    /// Attendance files with a readable date, most recently modified first.
    ///
    /// Files whose embedded date does not parse are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be listed.
    pub fn list(&self) -> Result<Vec<AttendanceEntry>> {
        let mut entries = Vec::new();
        for path in self.files()? {
            let Some(date) = file_date_text(&path).and_then(parse_file_date) else {
                debug!("Skipping {} with unreadable date", path.display());
                continue;
            };
            let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("Cannot read modification time of {}: {}", path.display(), e);
                    SystemTime::UNIX_EPOCH
                }
            };
            entries.push(AttendanceEntry {
                date,
                path,
                modified,
            });
        }
        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(b.date.cmp(&a.date)));
        Ok(entries)
    }

    /// Pick the `choice`th entry of a listing, counting from 1.
    ///
    /// Returns `None` for 0 or anything past the end.
    #[must_use]
    pub fn select(entries: &[AttendanceEntry], choice: usize) -> Option<&AttendanceEntry> {
        choice.checked_sub(1).and_then(|index| entries.get(index))
    }

    /// Raw text of an attendance file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| Error::AttendanceRead {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Raw text of the file for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttendanceNotFound`] if no file exists for the date.
    pub fn read_date(&self, date: NaiveDate) -> Result<String> {
        let path = self.path_for(date);
        if !path.is_file() {
            return Err(Error::AttendanceNotFound { date });
        }
        self.read(&path)
    }
}

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^attendance_(.*)\.txt$").expect("Invalid regex pattern"))
}

/// The text between `attendance_` and `.txt`, if the name has that shape.
fn file_date_text(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    file_name_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn parse_file_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, FILE_DATE_FORMAT).ok()
}
