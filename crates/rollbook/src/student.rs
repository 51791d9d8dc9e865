//! Core student record type for rollbook.
//!
//! A [`Student`] carries an immutable id, a mutable display name, a per-date
//! attendance map, and a single numeric score.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a student by the store. Never reused.
pub type StudentId = u32;

/// Lowest accepted score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest accepted score.
pub const MAX_SCORE: f64 = 100.0;

/// A single student and everything recorded about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    name: String,
    /// Presence per calendar date. One entry per date, last write wins.
    #[serde(default)]
    attendance: BTreeMap<NaiveDate, bool>,
    #[serde(default)]
    score: f64,
}

impl Student {
    /// Create a student with no attendance and a score of 0.
    #[must_use]
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attendance: BTreeMap::new(),
            score: 0.0,
        }
    }

    /// The student's id.
    #[must_use]
    pub fn id(&self) -> StudentId {
        self.id
    }

    /// The student's current name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// The student's score.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    pub(crate) fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Record presence for a date, replacing any earlier mark for that date.
    pub fn mark_attendance(&mut self, date: NaiveDate, present: bool) {
        self.attendance.insert(date, present);
    }

    /// Whether the student was present on `date`. Unrecorded dates count as absent.
    #[must_use]
    pub fn is_present_on(&self, date: NaiveDate) -> bool {
        self.attendance.get(&date).copied().unwrap_or(false)
    }

    /// All recorded dates and their presence, oldest first.
    #[must_use]
    pub fn attendance(&self) -> &BTreeMap<NaiveDate, bool> {
        &self.attendance
    }

    /// Number of recorded dates the student was present.
    #[must_use]
    pub fn days_present(&self) -> usize {
        self.attendance.values().filter(|present| **present).count()
    }

    /// Number of dates with any mark.
    #[must_use]
    pub fn days_recorded(&self) -> usize {
        self.attendance.len()
    }

    /// Percentage of recorded dates present, or 0 when nothing is recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn attendance_percentage(&self) -> f64 {
        let total = self.days_recorded();
        if total == 0 {
            return 0.0;
        }
        self.days_present() as f64 * 100.0 / total as f64
    }

    /// Presence in the most recent recorded session, or `false` if none.
    #[must_use]
    pub fn present_in_latest_session(&self) -> bool {
        self.attendance
            .last_key_value()
            .is_some_and(|(_, present)| *present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_student_new() {
        let student = Student::new(1, "Alice");
        assert_eq!(student.id(), 1);
        assert_eq!(student.name(), "Alice");
        assert!(student.attendance().is_empty());
        assert!((student.score() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unrecorded_date_is_absent() {
        let student = Student::new(1, "Alice");
        assert!(!student.is_present_on(date(2024, 1, 10)));
    }

    #[test]
    fn test_last_mark_for_date_wins() {
        let mut student = Student::new(1, "Alice");
        student.mark_attendance(date(2024, 1, 10), true);
        student.mark_attendance(date(2024, 1, 10), false);

        assert_eq!(student.days_recorded(), 1);
        assert!(!student.is_present_on(date(2024, 1, 10)));
    }

    #[test]
    fn test_attendance_percentage() {
        let mut student = Student::new(1, "Alice");
        assert!((student.attendance_percentage() - 0.0).abs() < f64::EPSILON);

        student.mark_attendance(date(2024, 1, 8), true);
        student.mark_attendance(date(2024, 1, 9), false);
        student.mark_attendance(date(2024, 1, 10), true);
        student.mark_attendance(date(2024, 1, 11), true);

        assert_eq!(student.days_present(), 3);
        assert_eq!(student.days_recorded(), 4);
        assert!((student.attendance_percentage() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_present_in_latest_session() {
        let mut student = Student::new(1, "Alice");
        assert!(!student.present_in_latest_session());

        student.mark_attendance(date(2024, 1, 10), false);
        student.mark_attendance(date(2024, 1, 2), true);
        assert!(!student.present_in_latest_session());

        student.mark_attendance(date(2024, 2, 1), true);
        assert!(student.present_in_latest_session());
    }

    #[test]
    fn test_serialization_uses_iso_dates() {
        let mut student = Student::new(4, "Dana");
        student.mark_attendance(date(2024, 1, 10), true);
        student.set_score(88.5);

        let json = serde_json::to_string(&student).unwrap();
        assert!(json.contains("\"2024-01-10\":true"));

        let decoded: Student = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, student);
    }

    #[test]
    fn test_deserialize_defaults_missing_fields() {
        let decoded: Student = serde_json::from_str(r#"{"id": 2, "name": "Bob"}"#).unwrap();
        assert_eq!(decoded.id(), 2);
        assert!(decoded.attendance().is_empty());
        assert!((decoded.score() - 0.0).abs() < f64::EPSILON);
    }
}
