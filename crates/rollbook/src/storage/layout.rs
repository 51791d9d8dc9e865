//! Fixed-width text layout of attendance files.
//!
//! Historical files are read back by column position, so every offset here is
//! load-bearing: changing a width makes older files unparseable.
//!
//! A file looks like:
//!
//! ```text
//! Date: 2024-01-10
//! ID    Name                           Status
//! --------------------------------------------------
//! 1     Alice                          PRESENT
//! 2     Bob                            ABSENT
//!
//! --- Summary ---
//! Total Students: 2
//! ...
//! ```

use std::fmt::Display;

use crate::student::StudentId;

/// Width of the id column.
pub const ID_WIDTH: usize = 5;

/// Width of the name column.
pub const NAME_WIDTH: usize = 30;

/// Width of the status column.
pub const STATUS_WIDTH: usize = 10;

/// Number of dashes in the line that opens the row section.
pub const SEPARATOR_WIDTH: usize = 50;

/// Prefix of section headers such as `--- Summary ---`.
pub const SECTION_MARKER: &str = "---";

/// Status text for a present student.
pub const PRESENT: &str = "PRESENT";

/// Status text for an absent student.
pub const ABSENT: &str = "ABSENT";

// One space separates each column.
const NAME_START: usize = ID_WIDTH + 1;
const NAME_END: usize = NAME_START + NAME_WIDTH;
const FULL_ROW_WIDTH: usize = NAME_END + 1 + STATUS_WIDTH;

/// The separator line.
#[must_use]
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Format one row: id, name, and status left-justified in their columns.
///
/// Values wider than their column are written in full, not truncated.
#[must_use]
pub fn format_row(id: impl Display, name: &str, status: &str) -> String {
    format!("{id:<ID_WIDTH$} {name:<NAME_WIDTH$} {status:<STATUS_WIDTH$}")
}

/// The column header line.
#[must_use]
pub fn column_header() -> String {
    format_row("ID", "Name", "Status")
}

/// Status text for a presence flag.
#[must_use]
pub fn status_text(present: bool) -> &'static str {
    if present {
        PRESENT
    } else {
        ABSENT
    }
}

/// What a line means to the row parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Header, separator, summary, or anything else outside the rows.
    Framing,
    /// A candidate data row.
    Row,
}

/// Position of a line scan relative to the row section.
///
/// The section opens on the separator line and closes on the first blank line
/// or section marker. `Closed` is terminal: a stray second separator later in
/// the file is never treated as the start of more rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSection {
    /// Before the separator.
    #[default]
    Preamble,
    /// Between the separator and the end of the rows.
    Rows,
    /// After the rows ended.
    Closed,
}

impl RowSection {
    /// Classify `line` and advance the state.
    pub fn classify(&mut self, line: &str) -> LineRole {
        match self {
            Self::Preamble => {
                if line == separator() {
                    *self = Self::Rows;
                }
                LineRole::Framing
            }
            Self::Rows => {
                if line.trim().is_empty() || line.starts_with(SECTION_MARKER) {
                    *self = Self::Closed;
                    LineRole::Framing
                } else {
                    LineRole::Row
                }
            }
            Self::Closed => LineRole::Framing,
        }
    }
}

/// The three columns of a row, trimmed, as found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields<'a> {
    /// Id column text.
    pub id: &'a str,
    /// Name column text.
    pub name: &'a str,
    /// Status text.
    pub status: &'a str,
}

impl<'a> RowFields<'a> {
    /// Split a row by column position.
    ///
    /// Short lines that cannot reach the status column fall back to the last
    /// whitespace-separated token for the status. A row cut off inside the
    /// name column therefore reports its last name word as the status.
    #[must_use]
    pub fn split(line: &'a str) -> Self {
        let id = char_slice(line, 0, ID_WIDTH).trim();
        let name = char_slice(line, NAME_START, NAME_END).trim();
        let status = if line.chars().count() >= FULL_ROW_WIDTH {
            char_slice(line, NAME_END, usize::MAX).trim()
        } else {
            line.split_whitespace().last().unwrap_or("")
        };
        Self { id, name, status }
    }

    /// The id column as a student id, if it is one.
    #[must_use]
    pub fn student_id(&self) -> Option<StudentId> {
        self.id.parse().ok()
    }
}

/// A data row read back from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// Student id.
    pub id: StudentId,
    /// Name as stored in the file.
    pub name: String,
    /// Status text as stored in the file.
    pub status: String,
}

/// Read every data row from the row section of an attendance file.
///
/// Lines inside the section whose id column is not a number are skipped.
#[must_use]
pub fn parse_rows(content: &str) -> Vec<ParsedRow> {
    let mut section = RowSection::default();
    content
        .lines()
        .filter(|line| section.classify(line) == LineRole::Row)
        .filter_map(|line| {
            let fields = RowFields::split(line);
            fields.student_id().map(|id| ParsedRow {
                id,
                name: fields.name.to_string(),
                status: fields.status.to_string(),
            })
        })
        .collect()
}

/// Slice by character position, clamped to the line.
fn char_slice(line: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| line.char_indices().nth(n).map_or(line.len(), |(i, _)| i);
    let from = byte_at(start);
    let to = byte_at(end).max(from);
    &line[from..to]
}
