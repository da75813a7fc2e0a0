//! Calendar of daily study targets.
//!
//! At most one target per date. Saving blank text for a date removes its
//! target.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTarget {
    pub date: NaiveDate,
    pub target: String,
}

/// One day cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub target: Option<String>,
}

/// A month laid out for a Sunday-first grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st (0 = month starts on Sunday).
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarStore {
    targets: BTreeMap<NaiveDate, String>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the target for `date`. Blank text clears it.
    ///
    /// Returns the previous target, if any.
    pub fn set_target(&mut self, date: NaiveDate, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return self.targets.remove(&date);
        }
        self.targets.insert(date, text.to_string())
    }

    pub fn remove(&mut self, date: NaiveDate) -> Option<String> {
        self.targets.remove(&date)
    }

    pub fn target_on(&self, date: NaiveDate) -> Option<&str> {
        self.targets.get(&date).map(String::as_str)
    }

    /// All targets ordered by date.
    pub fn all(&self) -> Vec<CalendarTarget> {
        self.targets
            .iter()
            .map(|(date, target)| CalendarTarget {
                date: *date,
                target: target.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets dated today or later.
    pub fn upcoming_count(&self, today: NaiveDate) -> usize {
        self.targets.range(today..).count()
    }

    /// Day cells for `year`-`month`.
    pub fn month(&self, year: i32, month: u32) -> Result<MonthView, ValidationError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month:02} is not a valid month"),
            }
        })?;

        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| DayCell {
                date,
                target: self.targets.get(&date).cloned(),
            })
            .collect();

        Ok(MonthView {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }
}
