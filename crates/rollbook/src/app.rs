//! The open roster and attendance directory for one session.
//!
//! [`Rollbook`] is loaded once at startup and passed to whatever drives it.
//! Every mutating call persists the snapshot before returning, so a failed
//! save is reported on the action that caused it.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::{AttendanceLog, StudentStore};
use crate::student::{Student, StudentId};
use crate::sync::{sync_names, SyncReport};

/// Roster, attendance log, and the settings they were opened with.
#[derive(Debug)]
pub struct Rollbook {
    config: Config,
    students: StudentStore,
    log: AttendanceLog,
}

impl Rollbook {
    /// Open the roster and attendance directory named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be read.
    pub fn open(config: Config) -> Result<Self> {
        let students = StudentStore::open(config.students_path())?;
        let log = AttendanceLog::new(config.attendance_dir());
        debug!("Attendance directory is {}", log.dir().display());
        Ok(Self {
            config,
            students,
            log,
        })
    }

    /// Settings this session was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The roster.
    #[must_use]
    pub fn students(&self) -> &StudentStore {
        &self.students
    }

    /// The attendance directory.
    #[must_use]
    pub fn attendance(&self) -> &AttendanceLog {
        &self.log
    }

    /// Add a student and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the snapshot cannot be saved.
    pub fn add_student(&mut self, name: &str) -> Result<Student> {
        let student = self.students.add(name)?.clone();
        self.students.save()?;
        Ok(student)
    }

    /// Rename a student and save, returning the previous name.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or the snapshot cannot be saved.
    pub fn rename_student(&mut self, id: StudentId, name: &str) -> Result<String> {
        let old = self.students.rename(id, name)?;
        self.students.save()?;
        Ok(old)
    }

    /// Set a student's score and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or the snapshot cannot be saved.
    pub fn set_score(&mut self, id: StudentId, score: f64) -> Result<()> {
        self.students.set_score(id, score)?;
        self.students.save()
    }

    /// Remove a student and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the snapshot cannot be saved.
    pub fn remove_student(&mut self, id: StudentId) -> Result<Student> {
        let removed = self.students.remove(id)?;
        self.students.save()?;
        Ok(removed)
    }

    /// Record a marking session for `date`, save the roster, and write the
    /// attendance file for that date. Returns the file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster is empty, an id is unknown, or either
    /// file cannot be written.
    pub fn mark_attendance(
        &mut self,
        date: NaiveDate,
        marks: &[(StudentId, bool)],
    ) -> Result<PathBuf> {
        if self.students.is_empty() {
            return Err(Error::NoStudents);
        }
        self.students.mark_attendance(date, marks)?;
        self.students.save()?;
        self.log.write(date, &self.students.attendance_rows(date))
    }

    /// Rewrite names in every attendance file to match the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the attendance directory cannot be listed.
    pub fn sync_names(&self) -> Result<SyncReport> {
        sync_names(&self.log, &self.students.name_index())
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the text is not a valid date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| Error::invalid_date(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::layout::parse_rows;
    use tempfile::TempDir;

    fn open_test_rollbook(dir: &TempDir) -> Rollbook {
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        Rollbook::open(config).unwrap()
    }

    #[test]
    fn test_mutations_are_saved() {
        let dir = TempDir::new().unwrap();
        let mut book = open_test_rollbook(&dir);
        book.add_student("Alice").unwrap();
        book.add_student("Bob").unwrap();
        book.set_score(2, 64.0).unwrap();
        book.rename_student(1, "Alicia").unwrap();

        let reopened = open_test_rollbook(&dir);
        assert_eq!(reopened.students().len(), 2);
        assert_eq!(reopened.students().get(1).unwrap().name(), "Alicia");
        assert!((reopened.students().get(2).unwrap().score() - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mark_attendance_requires_students() {
        let dir = TempDir::new().unwrap();
        let mut book = open_test_rollbook(&dir);
        let date = parse_date("2024-01-10").unwrap();

        assert!(matches!(
            book.mark_attendance(date, &[]),
            Err(Error::NoStudents)
        ));
        assert!(book.attendance().list().unwrap().is_empty());
    }

    #[test]
    fn test_mark_rename_sync_scenario() {
        let dir = TempDir::new().unwrap();
        let mut book = open_test_rollbook(&dir);
        book.add_student("Alice").unwrap();
        book.add_student("Bob").unwrap();
        let date = parse_date("2024-01-10").unwrap();

        let path = book.mark_attendance(date, &[(1, true), (2, false)]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("1     Alice                          PRESENT   \n"));
        assert!(content.contains("2     Bob                            ABSENT    \n"));
        assert!(content.contains("Total Students: 2"));
        assert!(content.contains("Present: 1"));
        assert!(content.contains("Absent: 1"));
        assert!(content.contains("Attendance: 50.00%"));

        book.rename_student(2, "Robert").unwrap();
        let report = book.sync_names().unwrap();
        assert_eq!(report.scanned, 1);
        assert_eq!(report.updated, 1);

        let rows = parse_rows(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].status, "PRESENT");
        assert_eq!(rows[1].name, "Robert");
        assert_eq!(rows[1].status, "ABSENT");

        // Attendance survives a restart.
        let reopened = open_test_rollbook(&dir);
        assert!(reopened.students().get(1).unwrap().is_present_on(date));
    }

    #[test]
    fn test_deleted_student_stays_in_old_files() {
        let dir = TempDir::new().unwrap();
        let mut book = open_test_rollbook(&dir);
        book.add_student("Alice").unwrap();
        book.add_student("Bob").unwrap();
        let date = parse_date("2024-01-10").unwrap();
        let path = book.mark_attendance(date, &[(1, true), (2, true)]).unwrap();

        book.remove_student(2).unwrap();
        let report = book.sync_names().unwrap();
        assert_eq!(report.updated, 0);
        assert!(std::fs::read_to_string(path).unwrap().contains("Bob"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-01-10 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(matches!(
            parse_date("10/01/2024"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_date("2024-02-30").is_err());
    }
}
