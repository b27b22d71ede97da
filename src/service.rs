//! Business rules for task operations.

use crate::db::Database;
use crate::error::ApiError;
use crate::types::{Task, TaskDraft};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Input for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl TaskCreateRequest {
    /// Field-by-field validation. An empty map means the input is acceptable.
    ///
    /// Blankness is whitespace-insensitive; lengths count characters.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        if self.title.trim().is_empty() {
            errors.insert("title".to_string(), "Title cannot be empty".to_string());
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.insert(
                "title".to_string(),
                format!("Title must be at most {} characters", TITLE_MAX_CHARS),
            );
        }

        if self.description.trim().is_empty() {
            errors.insert(
                "description".to_string(),
                "Description cannot be empty".to_string(),
            );
        } else if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.insert(
                "description".to_string(),
                format!(
                    "Description must be at most {} characters",
                    DESCRIPTION_MAX_CHARS
                ),
            );
        }

        errors
    }
}

/// Business component enforcing task state transitions on top of the store.
#[derive(Clone)]
pub struct TaskService {
    db: Database,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new active task and return the persisted record.
    ///
    /// The boundary validates before calling in; the check here keeps a
    /// direct caller from persisting invalid state.
    pub fn create_task(&self, request: &TaskCreateRequest) -> Result<Task, ApiError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        info!(title = %request.title, "Creating new task");
        let task = self
            .db
            .save_task(&TaskDraft::new(&request.title, &request.description))?;
        info!(id = task.id, "Task created successfully");

        Ok(task)
    }

    /// The five most recent non-completed tasks, newest first.
    pub fn recent_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let tasks = self.db.recent_active_tasks()?;
        info!(count = tasks.len(), "Fetched recent active tasks");
        Ok(tasks)
    }

    /// Mark a task as completed and return the updated record.
    ///
    /// Completing an already-completed task succeeds silently; there is no
    /// reverse transition.
    pub fn complete_task(&self, id: i64) -> Result<Task, ApiError> {
        let task = self
            .db
            .find_task(id)?
            .ok_or_else(|| ApiError::task_not_found(id))?;

        let mut draft = task.to_draft();
        draft.completed = true;
        let updated = self.db.save_task(&draft)?;

        info!(id, "Task marked as completed");
        Ok(updated)
    }

    /// Remove every task. Test cleanup only.
    pub fn delete_all_tasks(&self) -> Result<(), ApiError> {
        warn!("Deleting ALL tasks");
        self.db.delete_all_tasks()?;
        Ok(())
    }
}
