//! Task CRUD and the recent-active query.

use super::{Database, now_ms};
use crate::types::{Task, TaskDraft};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, Row, params};

/// Maximum number of rows returned by [`Database::recent_active_tasks`].
pub const RECENT_LIMIT: usize = 5;

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Internal helper to get a task using an existing connection.
fn find_task_internal(conn: &Connection, id: i64) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

    match stmt.query_row(params![id], parse_task_row) {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Persist a task.
    ///
    /// A draft with `id: None` is inserted (id assigned by the store,
    /// `created_at == updated_at`); a draft with `Some(id)` updates that row
    /// and refreshes `updated_at`. Updating an id with no row is an error.
    pub fn save_task(&self, draft: &TaskDraft) -> Result<Task> {
        let now = now_ms();

        self.with_conn(|conn| match draft.id {
            None => {
                conn.execute(
                    "INSERT INTO tasks (title, description, completed, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![draft.title, draft.description, draft.completed, now],
                )?;
                let id = conn.last_insert_rowid();
                find_task_internal(conn, id)?
                    .ok_or_else(|| anyhow!("inserted task row {} is missing", id))
            }
            Some(id) => {
                let changed = conn.execute(
                    "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![draft.title, draft.description, draft.completed, now, id],
                )?;
                if changed == 0 {
                    return Err(anyhow!("no task row with id {}", id));
                }
                find_task_internal(conn, id)?
                    .ok_or_else(|| anyhow!("updated task row {} is missing", id))
            }
        })
    }

    /// Look up a task by id. Absence is `Ok(None)`, not an error.
    pub fn find_task(&self, id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| find_task_internal(conn, id))
    }

    /// Up to five non-completed tasks, newest first.
    ///
    /// Equal `created_at` values fall back to id order, so same-millisecond
    /// inserts still list the latest insert first.
    pub fn recent_active_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM tasks WHERE completed = 0
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;

            let rows = stmt.query_map(params![RECENT_LIMIT as i64], parse_task_row)?;
            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row?);
            }
            Ok(tasks)
        })
    }

    /// Remove every task row. Idempotent.
    pub fn delete_all_tasks(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM tasks", [])?;
            Ok(())
        })
    }

    /// Total number of task rows, completed or not.
    pub fn count_tasks(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(count)
        })
    }
}
