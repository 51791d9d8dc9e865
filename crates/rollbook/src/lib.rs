//! `rollbook` - Keep a class roster, daily attendance, and scores
//!
//! This library provides the student store, the per-date fixed-width
//! attendance files, and the utility that rewrites names in past attendance
//! files after students are renamed.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod storage;
pub mod student;
pub mod sync;

pub use app::Rollbook;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{AttendanceLog, StudentStore};
pub use student::{Student, StudentId};
pub use sync::SyncReport;
