//! In-memory task list.
//!
//! Completely independent of the timer: no task is ever linked to a focus
//! session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Task priority.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(Priority::Low),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "high" | "h" => Ok(Priority::High),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("expected low, medium or high, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

/// Ordered collection of tasks, insertion order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. The title is trimmed and must not be blank.
    pub fn add(
        &mut self,
        title: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<&Task, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.tasks.push(Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            due_date,
            priority,
        });
        let task = &self.tasks[self.tasks.len() - 1];
        tracing::debug!(id = %task.id, %priority, "task added");
        Ok(task)
    }

    /// Flip the completed flag. Returns the new value.
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, ValidationError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ValidationError::UnknownTask(id))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Task, ValidationError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ValidationError::UnknownTask(id))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_toggle_remove() {
        let mut store = TaskStore::new();
        let id = store.add("  Read chapter 3 ", Priority::High, None).unwrap().id;
        store.add("Flashcards", Priority::default(), None).unwrap();

        assert_eq!(store.get(id).unwrap().title, "Read chapter 3");
        assert_eq!(store.pending_count(), 2);

        assert!(store.toggle(id).unwrap());
        assert_eq!(store.pending_count(), 1);
        assert!(!store.toggle(id).unwrap());

        let removed = store.remove(id).unwrap();
        assert_eq!(removed.priority, Priority::High);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].title, "Flashcards");
    }

    #[test]
    fn blank_title_rejected() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.add("   ", Priority::Low, None).unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_id_reported() {
        let mut store = TaskStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.toggle(id), Err(ValidationError::UnknownTask(id)));
        assert_eq!(store.remove(id), Err(ValidationError::UnknownTask(id)));
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        let store_default = TaskStore::new()
            .add("Flashcards", Priority::default(), None)
            .map(|t| t.priority);
        assert_eq!(store_default, Ok(Priority::Medium));
    }

    #[test]
    fn priority_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("m".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Low.to_string(), "low");
    }
}
