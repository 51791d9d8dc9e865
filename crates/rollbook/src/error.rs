//! Error types for rollbook.
//!
//! This module defines all error types used throughout the rollbook crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::student::StudentId;

/// The main error type for rollbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Student Snapshot Errors ===
    /// Failed to read the student snapshot.
    #[error("failed to read student data at {path}: {source}")]
    SnapshotRead {
        /// Path to the snapshot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the student snapshot.
    #[error("failed to save student data to {path}: {source}")]
    SnapshotWrite {
        /// Path to the snapshot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The student snapshot exists but could not be decoded.
    #[error("student data at {path} is corrupt: {source}")]
    SnapshotCorrupt {
        /// Path to the snapshot file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Attendance Log Errors ===
    /// Failed to read an attendance file.
    #[error("failed to read attendance file {path}: {source}")]
    AttendanceRead {
        /// Path to the attendance file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an attendance file.
    #[error("failed to save attendance file {path}: {source}")]
    AttendanceWrite {
        /// Path to the attendance file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Validation Errors ===
    /// A student name was empty after trimming.
    #[error("name cannot be empty")]
    EmptyName,

    /// A student name does not fit the attendance file name column.
    #[error("name is {length} characters, the limit is {max}")]
    NameTooLong {
        /// Length of the rejected name in characters.
        length: usize,
        /// Widest name the attendance files can hold.
        max: usize,
    },

    /// A student name contains a line break or other control character.
    #[error("name cannot contain control characters")]
    NameControlCharacter,

    /// A score fell outside the accepted range.
    #[error("score must be between 0 and 100, got {score}")]
    ScoreOutOfRange {
        /// The rejected score.
        score: f64,
    },

    /// No student has the given id.
    #[error("student not found with ID: {id}")]
    StudentNotFound {
        /// The id that was looked up.
        id: StudentId,
    },

    /// A date could not be parsed.
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The raw text that failed to parse.
        input: String,
    },

    /// An operation needs at least one student.
    #[error("no students found, add students first")]
    NoStudents,

    /// No attendance file exists for the requested date.
    #[error("no attendance record for {date}")]
    AttendanceNotFound {
        /// The requested date.
        date: NaiveDate,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to list a directory.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        /// Path that couldn't be listed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rollbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid date error from the rejected input.
    #[must_use]
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Check if this error was caused by operator input rather than the
    /// file system.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyName
                | Self::NameTooLong { .. }
                | Self::NameControlCharacter
                | Self::ScoreOutOfRange { .. }
                | Self::StudentNotFound { .. }
                | Self::InvalidDate { .. }
                | Self::NoStudents
                | Self::AttendanceNotFound { .. }
        )
    }

    /// Check if this error means a lookup found nothing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StudentNotFound { .. } | Self::AttendanceNotFound { .. }
        )
    }
}
