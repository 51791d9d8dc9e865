//! Plain-text tables for the roster and results screens.

use std::fmt::Write as _;

use serde::Serialize;

use crate::student::{Student, StudentId};

/// Roster with each student's overall attendance.
#[must_use]
pub fn student_table(students: &[Student]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<5} {:<25} {:>15}", "ID", "Name", "Attendance %");
    let _ = writeln!(out, "{}", "-".repeat(50));
    for s in students {
        let _ = writeln!(
            out,
            "{:<5} {:<25} {:>14.1}%",
            s.id(),
            s.name(),
            s.attendance_percentage()
        );
    }
    out
}

/// Scores with a yes/no for any recorded presence.
#[must_use]
pub fn results_table(students: &[Student]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<20} {:<10} {:<10}",
        "ID", "Name", "Present", "Score"
    );
    let _ = writeln!(out, "{}", "-".repeat(50));
    for s in students {
        let present = if s.days_present() > 0 { "Yes" } else { "No" };
        let _ = writeln!(
            out,
            "{:<5} {:<20} {:<10} {:<10.2}",
            s.id(),
            s.name(),
            present,
            s.score()
        );
    }
    out
}

/// Per-student day counts and percentage.
#[must_use]
pub fn attendance_summary_table(students: &[Student]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<25} {:>13} {:>12} {:>15}",
        "ID", "Name", "Present Days", "Total Days", "Percentage"
    );
    let _ = writeln!(out, "{}", "-".repeat(75));
    for s in students {
        let _ = writeln!(
            out,
            "{:<5} {:<25} {:>13} {:>12} {:>14.1}%",
            s.id(),
            s.name(),
            s.days_present(),
            s.days_recorded(),
            s.attendance_percentage()
        );
    }
    out
}

/// Machine-readable result line for `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentResult {
    /// Student id.
    pub id: StudentId,
    /// Current name.
    pub name: String,
    /// Score.
    pub score: f64,
    /// Days marked present.
    pub days_present: usize,
    /// Days with any mark.
    pub days_recorded: usize,
    /// Share of recorded days present.
    pub attendance_percentage: f64,
    /// Present at the most recent recorded session.
    pub present_latest: bool,
}

impl From<&Student> for StudentResult {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id(),
            name: s.name().to_string(),
            score: s.score(),
            days_present: s.days_present(),
            days_recorded: s.days_recorded(),
            attendance_percentage: s.attendance_percentage(),
            present_latest: s.present_in_latest_session(),
        }
    }
}

/// Results for every student, in roster order.
#[must_use]
pub fn results(students: &[Student]) -> Vec<StudentResult> {
    students.iter().map(StudentResult::from).collect()
}
