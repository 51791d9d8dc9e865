//! `rollbook` - CLI for the student record keeper
//!
//! Without a command this opens the interactive menu. Each subcommand performs
//! one action against the same roster and attendance directory and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::HashSet;
use std::io;

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use tracing::debug;

use rollbook::app::parse_date;
use rollbook::cli::{
    AttendanceCommand, Cli, Command, ConfigCommand, ResultsCommand, Shell, StudentsCommand,
};
use rollbook::report::{attendance_summary_table, results, results_table, student_table};
use rollbook::storage::AttendanceSummary;
use rollbook::{init_logging, AttendanceLog, Config, Rollbook, StudentId};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("could not load configuration")?;
    debug!("Data directory is {}", config.data_dir().display());

    // Config commands never touch the roster
    if let Some(Command::Config(config_cmd)) = &cli.command {
        return handle_config(&config, config_cmd);
    }

    let mut book = Rollbook::open(config)?;

    match cli.command {
        None | Some(Command::Menu) => run_menu(&mut book),
        Some(Command::Students(cmd)) => handle_students(&mut book, cmd),
        Some(Command::Attendance(cmd)) => handle_attendance(&mut book, cmd),
        Some(Command::Results(cmd)) => handle_results(&book, &cmd),
        Some(Command::Sync) => handle_sync(&book),
        Some(Command::Config(_)) => Ok(()),
    }
}

fn run_menu(book: &mut Rollbook) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(book, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

fn handle_students(book: &mut Rollbook, cmd: StudentsCommand) -> anyhow::Result<()> {
    match cmd {
        StudentsCommand::List => {
            if book.students().is_empty() {
                println!("No students found!");
            } else {
                print!("{}", student_table(book.students().students()));
            }
        }
        StudentsCommand::Add { name } => {
            let student = book.add_student(&name)?;
            println!(
                "Student '{}' (ID: {}) added successfully!",
                student.name(),
                student.id()
            );
        }
        StudentsCommand::Rename { id, name } => {
            let old = book.rename_student(id, &name)?;
            println!("Student name updated from '{old}' to '{}'", name.trim());
        }
        StudentsCommand::Delete { id, yes } => {
            let Some(student) = book.students().get(id) else {
                bail!(rollbook::Error::StudentNotFound { id });
            };
            if !yes {
                println!("This will delete {} (ID: {id}).", student.name());
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let removed = book.remove_student(id)?;
            println!("Student '{}' deleted successfully!", removed.name());
        }
        StudentsCommand::Score { id, score } => {
            book.set_score(id, score)?;
            println!("Score for ID {id} set to {score:.2}");
        }
    }
    Ok(())
}

fn handle_attendance(book: &mut Rollbook, cmd: AttendanceCommand) -> anyhow::Result<()> {
    match cmd {
        AttendanceCommand::Mark { date, absent } => {
            let date = match date {
                Some(text) => parse_date(&text)?,
                None => Local::now().date_naive(),
            };
            let absent: HashSet<StudentId> = absent.into_iter().collect();
            for id in &absent {
                if book.students().get(*id).is_none() {
                    bail!(rollbook::Error::StudentNotFound { id: *id });
                }
            }

            let marks: Vec<(StudentId, bool)> = book
                .students()
                .students()
                .iter()
                .map(|s| (s.id(), !absent.contains(&s.id())))
                .collect();
            let path = book.mark_attendance(date, &marks)?;
            let summary = AttendanceSummary::from_rows(&book.students().attendance_rows(date));

            println!("Attendance marked successfully for {}", date.format("%Y-%m-%d"));
            println!(
                "Present: {}, Absent: {} ({:.2}%)",
                summary.present,
                summary.absent,
                summary.percentage()
            );
            println!("File: {}", path.display());
        }
        AttendanceCommand::List => {
            let entries = book.attendance().list()?;
            if entries.is_empty() {
                println!("No attendance records found.");
            }
            for (i, entry) in entries.iter().enumerate() {
                println!("{}. {}", i + 1, entry.date.format("%Y-%m-%d"));
            }
        }
        AttendanceCommand::Show { selector } => {
            let content = if let Ok(choice) = selector.trim().parse::<usize>() {
                let entries = book.attendance().list()?;
                let Some(entry) = AttendanceLog::select(&entries, choice) else {
                    bail!(
                        "no attendance file at position {choice} ({} available)",
                        entries.len()
                    );
                };
                book.attendance().read(&entry.path)?
            } else {
                book.attendance().read_date(parse_date(&selector)?)?
            };
            print!("{content}");
        }
    }
    Ok(())
}

fn handle_results(book: &Rollbook, cmd: &ResultsCommand) -> anyhow::Result<()> {
    let students = book.students().students();
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&results(students))?);
        return Ok(());
    }

    if students.is_empty() {
        println!("No students found! Add students first.");
    } else if cmd.summary {
        print!("{}", attendance_summary_table(students));
    } else {
        print!("{}", results_table(students));
    }
    Ok(())
}

fn handle_sync(book: &Rollbook) -> anyhow::Result<()> {
    let report = book.sync_names()?;
    if report.is_empty() {
        println!("No attendance records found to sync.");
        return Ok(());
    }
    println!(
        "Synced names in {}/{} attendance files.",
        report.updated, report.scanned
    );
    for (path, reason) in &report.failed {
        eprintln!("Could not sync {}: {reason}", path.display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Students file:      {}", config.students_path().display());
                println!("  Attendance dir:     {}", config.attendance_dir().display());
                println!();
                println!("[Attendance]");
                println!(
                    "  Default present:    {}",
                    config.attendance.default_present
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
