//! Core types for the Task API.

use serde::{Deserialize, Serialize};

/// A persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Epoch milliseconds, set once at first persistence.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
}

/// Task state to persist.
///
/// `id: None` inserts a new row (the store assigns id and timestamps);
/// `Some(id)` updates that row and refreshes `updated_at`.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TaskDraft {
    /// Draft for a brand-new active task.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }
}

impl Task {
    /// Draft carrying this task's current state, for an update.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            id: Some(self.id),
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
        }
    }
}
