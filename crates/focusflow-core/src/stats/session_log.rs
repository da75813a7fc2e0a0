//! Append-only log of completed focus sessions.
//!
//! Sessions are never merged on write; several entries may share a date and
//! are summed when the log is read.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Days covered by the trailing statistics window, today included.
pub const TRAILING_DAYS: u64 = 7;

/// One naturally completed focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub minutes: u32,
}

/// Minutes studied on one day of the trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMinutes {
    pub date: NaiveDate,
    /// Short weekday label ("Mon", "Tue", ...).
    pub label: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    sessions: Vec<StudySession>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log pre-filled with a short history: 45 minutes two days ago and
    /// 120 minutes yesterday.
    pub fn with_sample_history(today: NaiveDate) -> Self {
        let mut log = Self::new();
        let samples = [(2, 45), (1, 120)];
        for (days_ago, minutes) in samples {
            if let Some(date) = today.checked_sub_days(Days::new(days_ago)) {
                log.sessions.push(StudySession { date, minutes });
            }
        }
        log
    }

    /// Append a session.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroMinutes`] for an empty session.
    pub fn append(&mut self, session: StudySession) -> Result<(), ValidationError> {
        if session.minutes == 0 {
            return Err(ValidationError::ZeroMinutes);
        }
        tracing::debug!(date = %session.date, minutes = session.minutes, "session logged");
        self.sessions.push(session);
        Ok(())
    }

    /// All sessions in insertion order.
    pub fn all(&self) -> &[StudySession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn total_minutes(&self) -> u64 {
        self.sessions.iter().map(|s| u64::from(s.minutes)).sum()
    }

    /// Summed minutes per date.
    ///
    /// The trailing [`TRAILING_DAYS`] ending at `today` are always present
    /// (zero when nothing was logged); dates outside that window appear only
    /// if they have sessions.
    pub fn minutes_by_date(&self, today: NaiveDate) -> BTreeMap<NaiveDate, u64> {
        let mut map: BTreeMap<NaiveDate, u64> = trailing_window(today).map(|d| (d, 0)).collect();
        for s in &self.sessions {
            *map.entry(s.date).or_insert(0) += u64::from(s.minutes);
        }
        map
    }

    /// The trailing week ending at `today`, oldest first, for chart rendering.
    pub fn weekly(&self, today: NaiveDate) -> Vec<DailyMinutes> {
        let by_date = self.minutes_by_date(today);
        trailing_window(today)
            .map(|date| DailyMinutes {
                date,
                label: date.format("%a").to_string(),
                minutes: by_date
                    .get(&date)
                    .copied()
                    .unwrap_or(0)
                    .try_into()
                    .unwrap_or(u32::MAX),
            })
            .collect()
    }
}

/// Oldest-first dates of the window ending at `today`.
fn trailing_window(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..TRAILING_DAYS)
        .rev()
        .filter_map(move |days_ago| today.checked_sub_days(Days::new(days_ago)))
}
