//! Storage layer for rollbook.
//!
//! This module provides file-based persistence for the roster and the
//! per-date attendance logs:
//! - [`StudentStore`]: whole-roster JSON snapshot
//! - [`AttendanceLog`]: one fixed-width text file per marked date
//! - [`layout`]: the column layout shared by the writer and the name sync

pub mod attendance;
pub mod layout;
pub mod students;

pub use attendance::{AttendanceEntry, AttendanceLog, AttendanceRow, AttendanceSummary};
pub use students::StudentStore;
