//! Study-time statistics.
//!
//! The session log is the only data source; every aggregate is computed on
//! read.

mod session_log;

pub use session_log::{DailyMinutes, SessionLog, StudySession, TRAILING_DAYS};
