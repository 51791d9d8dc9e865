//! Command-line interface for rollbook.
//!
//! This module provides the CLI structure for the `rollbook` binary and the
//! interactive menu shell it falls back to when no command is given.

mod commands;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AttendanceCommand, ConfigCommand, ResultsCommand, StudentsCommand};
pub use shell::Shell;

/// rollbook - Keep a class roster, daily attendance, and scores
///
/// Run without a command to open the interactive menu.
#[derive(Debug, Parser)]
#[command(name = "rollbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive menu (default)
    Menu,

    /// Manage the student roster
    #[command(subcommand)]
    Students(StudentsCommand),

    /// Mark and view attendance
    #[command(subcommand)]
    Attendance(AttendanceCommand),

    /// Show scores or attendance summaries
    Results(ResultsCommand),

    /// Rewrite names in past attendance files to match the roster
    Sync,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "rollbook");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let quiet = Cli::try_parse_from(["rollbook", "-q"]).unwrap();
        assert_eq!(quiet.verbosity(), crate::logging::Verbosity::Quiet);

        let normal = Cli::try_parse_from(["rollbook"]).unwrap();
        assert_eq!(normal.verbosity(), crate::logging::Verbosity::Normal);

        let verbose = Cli::try_parse_from(["rollbook", "-v"]).unwrap();
        assert_eq!(verbose.verbosity(), crate::logging::Verbosity::Verbose);

        let trace = Cli::try_parse_from(["rollbook", "-vv", "sync"]).unwrap();
        assert_eq!(trace.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_no_command_means_menu() {
        let cli = Cli::try_parse_from(["rollbook"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_students_add() {
        let cli = Cli::try_parse_from(["rollbook", "students", "add", "Alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Students(StudentsCommand::Add { ref name })) if name == "Alice"
        ));
    }

    #[test]
    fn test_parse_students_score() {
        let cli = Cli::try_parse_from(["rollbook", "students", "score", "3", "87.5"]).unwrap();
        match cli.command {
            Some(Command::Students(StudentsCommand::Score { id, score })) => {
                assert_eq!(id, 3);
                assert!((score - 87.5).abs() < f64::EPSILON);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_attendance_mark() {
        let cli = Cli::try_parse_from([
            "rollbook",
            "attendance",
            "mark",
            "--date",
            "2024-01-10",
            "--absent",
            "2",
            "-a",
            "5",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Attendance(AttendanceCommand::Mark { date, absent })) => {
                assert_eq!(date.as_deref(), Some("2024-01-10"));
                assert_eq!(absent, vec![2, 5]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["rollbook", "-c", "/custom/config.toml", "sync"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_results_flags() {
        let cli = Cli::try_parse_from(["rollbook", "results", "--summary", "--json"]).unwrap();
        match cli.command {
            Some(Command::Results(results)) => {
                assert!(results.summary);
                assert!(results.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
