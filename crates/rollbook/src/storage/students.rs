//! Student snapshot store.
//!
//! The whole roster lives in memory and is written back to a single JSON file
//! on every [`StudentStore::save`]. There is no partial update on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::storage::attendance::AttendanceRow;
use crate::storage::layout::NAME_WIDTH;
use crate::student::{Student, StudentId, MAX_SCORE, MIN_SCORE};

/// Owner of every [`Student`] and the file they are persisted to.
#[derive(Debug)]
pub struct StudentStore {
    /// Path to the snapshot file.
    path: PathBuf,
    /// Students in insertion order.
    students: Vec<Student>,
    /// Id handed to the next added student.
    next_id: StudentId,
}

impl StudentStore {
    /// Load the snapshot at `path`.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let students: Vec<Student> = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| {
                Error::SnapshotCorrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No student snapshot at {}, starting empty", path.display());
                Vec::new()
            }
            Err(source) => return Err(Error::SnapshotRead { path, source }),
        };

        let next_id = students.iter().map(Student::id).max().unwrap_or(0) + 1;
        info!(
            "Loaded {} students from {}",
            students.len(),
            path.display()
        );
        Ok(Self {
            path,
            students,
            next_id,
        })
    }

    /// Get the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full roster to the snapshot file, replacing it.
    ///
    /// Creates the parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.students)?;
        std::fs::write(&self.path, json).map_err(|source| Error::SnapshotWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "Saved {} students to {}",
            self.students.len(),
            self.path.display()
        );
        Ok(())
    }

    /// All students in the order they were added.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Number of students.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Look up a student by id.
    #[must_use]
    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id() == id)
    }

    fn get_mut(&mut self, id: StudentId) -> Result<&mut Student> {
        self.students
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(Error::StudentNotFound { id })
    }

    /// Add a student, assigning the next id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] if the trimmed name is empty.
    pub fn add(&mut self, name: &str) -> Result<&Student> {
        let name = validate_name(name)?;
        let id = self.next_id;
        self.next_id += 1;

        self.students.push(Student::new(id, name));
        info!("Added student {} with id {}", name, id);
        Ok(&self.students[self.students.len() - 1])
    }

    /// Rename a student, returning the previous name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the id is unknown.
    pub fn rename(&mut self, id: StudentId, name: &str) -> Result<String> {
        let name = validate_name(name)?.to_string();
        let student = self.get_mut(id)?;
        let old = student.name().to_string();
        student.set_name(name);
        info!("Renamed student {} from {} to {}", id, old, student.name());
        Ok(old)
    }

    /// Set a student's score.
    ///
    /// # Errors
    ///
    /// Returns an error if the score is outside 0 to 100 or the id is unknown.
    pub fn set_score(&mut self, id: StudentId, score: f64) -> Result<()> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(Error::ScoreOutOfRange { score });
        }
        self.get_mut(id)?.set_score(score);
        debug!("Set score for student {} to {:.2}", id, score);
        Ok(())
    }

    /// Remove a student from the roster.
    ///
    /// Attendance files already written keep their rows for this student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if the id is unknown.
    pub fn remove(&mut self, id: StudentId) -> Result<Student> {
        let index = self
            .students
            .iter()
            .position(|s| s.id() == id)
            .ok_or(Error::StudentNotFound { id })?;
        let removed = self.students.remove(index);
        info!("Removed student {} ({})", id, removed.name());
        Ok(removed)
    }

    /// Record presence for `date` for each `(id, present)` pair.
    ///
    /// Every id is checked before anything is recorded, so an unknown id
    /// leaves the roster untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] for the first unknown id.
    pub fn mark_attendance(&mut self, date: NaiveDate, marks: &[(StudentId, bool)]) -> Result<()> {
        if let Some((id, _)) = marks.iter().find(|(id, _)| self.get(*id).is_none()) {
            return Err(Error::StudentNotFound { id: *id });
        }
        for (id, present) in marks {
            self.get_mut(*id)?.mark_attendance(date, *present);
        }
        debug!("Marked attendance for {} students on {}", marks.len(), date);
        Ok(())
    }

    /// Snapshot of every student's presence on `date`, in roster order.
    #[must_use]
    pub fn attendance_rows(&self, date: NaiveDate) -> Vec<AttendanceRow> {
        self.students
            .iter()
            .map(|s| AttendanceRow::new(s.id(), s.name(), s.is_present_on(date)))
            .collect()
    }

    /// Current name of every student, keyed by id.
    #[must_use]
    pub fn name_index(&self) -> HashMap<StudentId, String> {
        self.students
            .iter()
            .map(|s| (s.id(), s.name().to_string()))
            .collect()
    }
}

/// Trim a name and check it fits on one attendance row.
fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    if name.chars().any(char::is_control) {
        return Err(Error::NameControlCharacter);
    }
    let length = name.chars().count();
    if length > NAME_WIDTH {
        return Err(Error::NameTooLong {
            length,
            max: NAME_WIDTH,
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(dir: &TempDir) -> StudentStore {
        StudentStore::open(dir.path().join("students.json")).expect("failed to open test store")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);
        assert!(store.is_empty());
        assert_eq!(store.path(), dir.path().join("students.json"));
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");
        std::fs::write(&path, "not json").unwrap();

        let err = StudentStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::SnapshotCorrupt { .. }));
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);

        assert_eq!(store.add("Alice").unwrap().id(), 1);
        assert_eq!(store.add("  Bob  ").unwrap().id(), 2);
        assert_eq!(store.get(2).unwrap().name(), "Bob");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);

        assert!(matches!(store.add("   "), Err(Error::EmptyName)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);

        store.add("Alice").unwrap();
        store.add("Bob").unwrap();
        store.remove(2).unwrap();

        assert_eq!(store.add("Carol").unwrap().id(), 3);
    }

    #[test]
    fn test_remove_unknown_id() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        assert!(matches!(
            store.remove(42),
            Err(Error::StudentNotFound { id: 42 })
        ));
    }

    #[test]
    fn test_rename_returns_old_name() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        store.add("Bob").unwrap();

        let old = store.rename(1, "Robert").unwrap();
        assert_eq!(old, "Bob");
        assert_eq!(store.get(1).unwrap().name(), "Robert");
    }

    #[test]
    fn test_rename_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        store.add("Bob").unwrap();

        assert!(matches!(store.rename(1, ""), Err(Error::EmptyName)));
        assert_eq!(store.get(1).unwrap().name(), "Bob");
    }

    #[test]
    fn test_set_score_range() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        store.add("Alice").unwrap();

        store.set_score(1, 92.5).unwrap();
        assert!((store.get(1).unwrap().score() - 92.5).abs() < f64::EPSILON);

        assert!(matches!(
            store.set_score(1, 100.5),
            Err(Error::ScoreOutOfRange { .. })
        ));
        assert!(matches!(
            store.set_score(1, -1.0),
            Err(Error::ScoreOutOfRange { .. })
        ));
        assert!(matches!(
            store.set_score(1, f64::NAN),
            Err(Error::ScoreOutOfRange { .. })
        ));
        assert!(matches!(
            store.set_score(9, 50.0),
            Err(Error::StudentNotFound { id: 9 })
        ));
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("students.json");

        let mut store = StudentStore::open(&path).unwrap();
        store.add("Alice").unwrap();
        store.add("Bob").unwrap();
        store.set_score(2, 71.0).unwrap();
        store
            .mark_attendance(date(2024, 1, 10), &[(1, true), (2, false)])
            .unwrap();
        store.save().unwrap();

        let reopened = StudentStore::open(&path).unwrap();
        assert_eq!(reopened.students(), store.students());
    }

    #[test]
    fn test_next_id_follows_highest_loaded_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.json");

        let mut store = StudentStore::open(&path).unwrap();
        for name in ["A", "B", "C"] {
            store.add(name).unwrap();
        }
        store.remove(1).unwrap();
        store.save().unwrap();

        let mut reopened = StudentStore::open(&path).unwrap();
        assert_eq!(reopened.add("D").unwrap().id(), 4);
    }

    #[test]
    fn test_mark_attendance_unknown_id_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        store.add("Alice").unwrap();

        let result = store.mark_attendance(date(2024, 1, 10), &[(1, true), (5, true)]);
        assert!(matches!(result, Err(Error::StudentNotFound { id: 5 })));
        assert_eq!(store.get(1).unwrap().days_recorded(), 0);
    }

    #[test]
    fn test_attendance_rows_in_roster_order() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        store.add("Alice").unwrap();
        store.add("Bob").unwrap();
        store.add("Carol").unwrap();
        store
            .mark_attendance(date(2024, 1, 10), &[(1, true), (2, false)])
            .unwrap();

        let rows = store.attendance_rows(date(2024, 1, 10));
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(rows[0].present);
        assert!(!rows[1].present);
        // Never marked for this date.
        assert!(!rows[2].present);
    }

    #[test]
    fn test_name_index() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        store.add("Alice").unwrap();
        store.add("Bob").unwrap();

        let index = store.name_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&2], "Bob");
    }

    #[test]
    fn test_name_must_fit_name_column() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);

        let widest = "A".repeat(NAME_WIDTH);
        assert_eq!(store.add(&widest).unwrap().name(), widest);

        let long = "Bartholomew Maximilian Fitzgerald III";
        assert_eq!(long.chars().count(), 37);
        assert!(matches!(
            store.add(long),
            Err(Error::NameTooLong { length: 37, max: NAME_WIDTH })
        ));
        assert!(matches!(
            store.rename(1, long),
            Err(Error::NameTooLong { .. })
        ));
        assert_eq!(store.get(1).unwrap().name(), widest);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_name_width_counts_characters() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        // 30 characters, more than 30 bytes.
        let name = "Ångström ".repeat(3) + "Zoë";
        assert_eq!(name.chars().count(), NAME_WIDTH);
        assert!(store.add(&name).is_ok());
    }

    #[test]
    fn test_name_rejects_control_characters() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        assert!(matches!(
            store.add("A\n2     Mallory"),
            Err(Error::NameControlCharacter)
        ));
        assert!(matches!(
            store.add("Carol\rAnn"),
            Err(Error::NameControlCharacter)
        ));
        store.add("Alice").unwrap();
        assert!(matches!(
            store.rename(1, "Ali\tce"),
            Err(Error::NameControlCharacter)
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().name(), "Alice");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed_before_checks() {
        let dir = TempDir::new().unwrap();
        let mut store = create_test_store(&dir);
        let padded = format!("  {}\n", "B".repeat(NAME_WIDTH));
        assert_eq!(store.add(&padded).unwrap().name(), "B".repeat(NAME_WIDTH));
    }
}
