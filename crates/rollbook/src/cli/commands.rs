//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::student::StudentId;

/// Roster management commands.
#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List all students with their attendance percentage
    List,

    /// Add a student
    Add {
        /// Student name
        name: String,
    },

    /// Change a student's name
    Rename {
        /// Student ID
        id: StudentId,
        /// New name
        name: String,
    },

    /// Delete a student
    Delete {
        /// Student ID
        id: StudentId,
        /// Skip the confirmation notice
        #[arg(short, long)]
        yes: bool,
    },

    /// Set a student's score (0-100)
    Score {
        /// Student ID
        id: StudentId,
        /// Score between 0 and 100
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },
}

/// Attendance commands.
#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// Mark attendance for a date; everyone not listed as absent is present
    Mark {
        /// Date to mark (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// ID of an absent student (repeatable)
        #[arg(short, long = "absent", value_name = "ID")]
        absent: Vec<StudentId>,
    },

    /// List attendance files, most recent first
    List,

    /// Print an attendance file
    Show {
        /// Position in `attendance list` (1 = newest) or a date (YYYY-MM-DD)
        selector: String,
    },
}

/// Results command arguments.
#[derive(Debug, Args)]
pub struct ResultsCommand {
    /// Show per-student attendance day counts instead of scores
    #[arg(short, long)]
    pub summary: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file to validate
        file: Option<PathBuf>,
    },
}
