//! Interactive menu shell.
//!
//! Reads one answer per line. Every action's error is printed and the shell
//! returns to the menu it came from; end of input leaves the shell.

use std::io::{BufRead, Write};

use chrono::{Local, NaiveDate};
use tracing::{error, warn};

use crate::app::{parse_date, Rollbook};
use crate::error::{Error, Result};
use crate::report::{attendance_summary_table, results_table, student_table};
use crate::storage::layout::{separator, status_text};
use crate::storage::AttendanceLog;
use crate::student::StudentId;

const NO_STUDENTS: &str = "No students found! Add students first.";

/// Menu-driven front end over a [`Rollbook`].
#[derive(Debug)]
pub struct Shell<'a, R, W> {
    book: &'a mut Rollbook,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Create a shell reading answers from `input` and printing to `output`.
    pub fn new(book: &'a mut Rollbook, input: R, output: W) -> Self {
        Self {
            book,
            input,
            output,
        }
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the main menu until the operator exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n===== Rollbook =====")?;
            writeln!(self.output, "1. Manage Students")?;
            writeln!(self.output, "2. Attendance")?;
            writeln!(self.output, "3. Results")?;
            writeln!(self.output, "4. Sync Attendance Names")?;
            writeln!(self.output, "5. Exit")?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            let result = match choice.parse::<u32>() {
                Ok(1) => self.students_menu(),
                Ok(2) => self.attendance_menu(),
                Ok(3) => self.results_menu(),
                Ok(4) => self.sync_names(),
                Ok(5) => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                Ok(_) => self.say("Invalid choice, try again!"),
                Err(_) => self.say("Please enter a valid number!"),
            };
            self.recover(result)?;
        }
    }

    fn students_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n--- Manage Students ---")?;
            writeln!(self.output, "1. Add Student")?;
            writeln!(self.output, "2. View All Students")?;
            writeln!(self.output, "3. Update Student")?;
            writeln!(self.output, "4. Delete Student")?;
            writeln!(self.output, "5. Set/Update Score")?;
            writeln!(self.output, "6. Go Back")?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            let result = match choice.parse::<u32>() {
                Ok(1) => self.add_student(),
                Ok(2) => self.view_students(),
                Ok(3) => self.update_student(),
                Ok(4) => self.delete_student(),
                Ok(5) => self.set_score(),
                Ok(6) => return Ok(()),
                Ok(_) => self.say("Invalid choice!"),
                Err(_) => self.say("Please enter a valid number!"),
            };
            self.recover(result)?;
        }
    }

    fn attendance_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n--- Attendance Management ---")?;
            writeln!(self.output, "1. Mark Attendance")?;
            writeln!(self.output, "2. View Attendance Report")?;
            writeln!(self.output, "3. Back to Main Menu")?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            let result = match choice.parse::<u32>() {
                Ok(1) => self.mark_attendance(),
                Ok(2) => self.view_attendance_report(),
                Ok(3) => return Ok(()),
                Ok(_) => self.say("Invalid choice, try again!"),
                Err(_) => self.say("Please enter a valid number!"),
            };
            self.recover(result)?;
        }
    }

    fn results_menu(&mut self) -> Result<()> {
        if self.book.students().is_empty() {
            return self.say(NO_STUDENTS);
        }

        loop {
            writeln!(self.output, "\n--- Student Results ---")?;
            writeln!(self.output, "1. View All Results")?;
            writeln!(self.output, "2. View Attendance Summary")?;
            writeln!(self.output, "3. Back to Main Menu")?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            match choice.parse::<u32>() {
                Ok(1) => {
                    let table = results_table(self.book.students().students());
                    write!(self.output, "\n--- All Student Results ---\n{table}")?;
                }
                Ok(2) => {
                    let table = attendance_summary_table(self.book.students().students());
                    write!(self.output, "\n--- Attendance Summary ---\n{table}")?;
                }
                Ok(3) => return Ok(()),
                Ok(_) => self.say("Invalid choice, try again!")?,
                Err(_) => self.say("Please enter a valid number!")?,
            }
        }
    }

    fn add_student(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter student name: ")? else {
            return Ok(());
        };
        let student = self.book.add_student(&name)?;
        writeln!(
            self.output,
            "Student '{}' (ID: {}) added successfully!",
            student.name(),
            student.id()
        )?;
        Ok(())
    }

    /// Print the roster. Returns `false` if there is nobody to act on.
    fn show_roster(&mut self) -> Result<bool> {
        if self.book.students().is_empty() {
            self.say("No students found!")?;
            return Ok(false);
        }
        let table = student_table(self.book.students().students());
        write!(self.output, "\n--- All Students ---\n{table}")?;
        Ok(true)
    }

    fn view_students(&mut self) -> Result<()> {
        self.show_roster().map(drop)
    }

    /// Show the roster and ask for an id that exists.
    fn pick_student(&mut self, action: &str) -> Result<Option<StudentId>> {
        if !self.show_roster()? {
            return Ok(None);
        }
        let Some(answer) = self.prompt(&format!("\nEnter student ID to {action}: "))? else {
            return Ok(None);
        };
        let Ok(id) = answer.parse::<StudentId>() else {
            self.say("Please enter a valid student ID!")?;
            return Ok(None);
        };
        if self.book.students().get(id).is_none() {
            return Err(Error::StudentNotFound { id });
        }
        Ok(Some(id))
    }

    fn update_student(&mut self) -> Result<()> {
        let Some(id) = self.pick_student("update")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Enter new name (or press Enter to keep current): ")? else {
            return Ok(());
        };
        if name.is_empty() {
            return self.say("No changes made.");
        }
        let old = self.book.rename_student(id, &name)?;
        writeln!(self.output, "Student name updated from '{old}' to '{name}'")?;
        Ok(())
    }

    fn delete_student(&mut self) -> Result<()> {
        let Some(id) = self.pick_student("delete")? else {
            return Ok(());
        };
        let name = self
            .book
            .students()
            .get(id)
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        let Some(confirm) = self.prompt(&format!("Are you sure you want to delete {name}? (y/n): "))?
        else {
            return Ok(());
        };
        if is_yes(&confirm) {
            self.book.remove_student(id)?;
            self.say("Student deleted successfully!")
        } else {
            self.say("Deletion cancelled.")
        }
    }

    fn set_score(&mut self) -> Result<()> {
        let Some(id) = self.pick_student("set score")? else {
            return Ok(());
        };
        let Some(answer) = self.prompt("Enter score (0-100): ")? else {
            return Ok(());
        };
        let Ok(score) = answer.parse::<f64>() else {
            return self.say("Please enter valid numeric values!");
        };
        self.book.set_score(id, score)?;
        if let Some(student) = self.book.students().get(id) {
            writeln!(
                self.output,
                "Score for '{}' (ID: {}) set to {:.2}",
                student.name(),
                student.id(),
                student.score()
            )?;
        }
        Ok(())
    }

    fn mark_attendance(&mut self) -> Result<()> {
        if self.book.students().is_empty() {
            return self.say(NO_STUDENTS);
        }
        writeln!(self.output, "\n--- Mark Attendance ---")?;

        let Some(date) = self.prompt_date()? else {
            return Ok(());
        };

        let default_present = self.book.config().attendance.default_present;
        let hint = if default_present { "y" } else { "n" };
        let roster: Vec<(StudentId, String)> = self
            .book
            .students()
            .students()
            .iter()
            .map(|s| (s.id(), s.name().to_string()))
            .collect();

        let mut marks = Vec::with_capacity(roster.len());
        for (id, name) in roster {
            writeln!(self.output, "\nStudent: {name} (ID: {id})")?;
            let Some(answer) = self.prompt(&format!("Present? (y/n, default={hint}): "))? else {
                return Ok(());
            };
            let present = if answer.is_empty() {
                default_present
            } else {
                is_yes(&answer)
            };
            writeln!(
                self.output,
                "Marked {name} as {} for {}",
                status_text(present),
                date.format("%b %d, %Y")
            )?;
            marks.push((id, present));
        }

        self.book.mark_attendance(date, &marks)?;
        writeln!(
            self.output,
            "\nAttendance marked successfully for {}",
            date.format("%Y-%m-%d")
        )?;
        Ok(())
    }

    /// Ask until a valid date or an empty answer (today) is given.
    fn prompt_date(&mut self) -> Result<Option<NaiveDate>> {
        loop {
            let Some(answer) =
                self.prompt("\nEnter date (YYYY-MM-DD, or press Enter for today): ")?
            else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(Local::now().date_naive()));
            }
            match parse_date(&answer) {
                Ok(date) => return Ok(Some(date)),
                Err(_) => self.say(
                    "Invalid date format. Please use YYYY-MM-DD format or press Enter for today.",
                )?,
            }
        }
    }

    fn view_attendance_report(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Attendance Report ---")?;
        let entries = self.book.attendance().list()?;
        if entries.is_empty() {
            return self.say("No attendance records found.");
        }

        writeln!(self.output, "\nAvailable dates:")?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, entry.date.format("%Y-%m-%d"))?;
        }

        let Some(answer) = self.prompt("\nSelect a date (number) or 0 to go back: ")? else {
            return Ok(());
        };
        let Ok(choice) = answer.parse::<usize>() else {
            return self.say("Invalid selection.");
        };
        let Some(entry) = AttendanceLog::select(&entries, choice) else {
            return Ok(());
        };

        let content = self.book.attendance().read(&entry.path)?;
        let rule = separator();
        writeln!(self.output, "\n{rule}\nATTENDANCE REPORT\n{rule}")?;
        write!(self.output, "{content}")?;
        writeln!(self.output, "{rule}\nFile: {}", entry.path.display())?;
        Ok(())
    }

    fn sync_names(&mut self) -> Result<()> {
        let report = self.book.sync_names()?;
        if report.is_empty() {
            return self.say("No attendance records found to sync.");
        }
        writeln!(
            self.output,
            "Synced names in {}/{} attendance files.",
            report.updated, report.scanned
        )?;
        for (path, reason) in &report.failed {
            writeln!(self.output, "  Could not sync {}: {reason}", path.display())?;
        }
        Ok(())
    }

    /// Print an action's error and carry on. Only terminal failures escape.
    fn recover(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            // Storage wraps every file error with its path, so a bare I/O
            // error here came from reading input or writing output.
            Err(Error::Io(e)) => Err(Error::Io(e)),
            Err(e) => {
                if e.is_validation_error() {
                    warn!("{e}");
                } else {
                    error!("{e}");
                }
                writeln!(self.output, "Error: {e}")?;
                Ok(())
            }
        }
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Print `message` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}
