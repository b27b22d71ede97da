//! Integration tests for the database layer.
//!
//! These tests verify the store operations using an in-memory SQLite
//! database, plus one on-disk reopen check.

use std::thread::sleep;
use std::time::Duration;
use task_api::db::Database;
use task_api::types::TaskDraft;

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn draft(title: &str, description: &str) -> TaskDraft {
    TaskDraft::new(title, description)
}

mod save_tests {
    use super::*;

    #[test]
    fn insert_assigns_id_and_equal_timestamps() {
        let db = setup_db();

        let task = db
            .save_task(&draft("Write report", "Quarterly numbers"))
            .expect("Failed to save task");

        assert!(task.id > 0);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "Quarterly numbers");
        assert!(!task.completed);
        assert!(task.created_at > 0);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn inserts_assign_increasing_ids() {
        let db = setup_db();

        let first = db.save_task(&draft("First", "one")).unwrap();
        let second = db.save_task(&draft("Second", "two")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn update_refreshes_updated_at_and_keeps_created_at() {
        let db = setup_db();
        let task = db.save_task(&draft("Original", "before")).unwrap();

        sleep(Duration::from_millis(5));
        let mut update = task.to_draft();
        update.completed = true;
        let updated = db.save_task(&update).unwrap();

        assert_eq!(updated.id, task.id);
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at > task.updated_at);
    }

    #[test]
    fn update_of_missing_id_is_an_error() {
        let db = setup_db();

        let mut update = draft("Ghost", "no row");
        update.id = Some(999);

        assert!(db.save_task(&update).is_err());
    }
}

mod find_tests {
    use super::*;

    #[test]
    fn find_returns_saved_task() {
        let db = setup_db();
        let saved = db.save_task(&draft("Findable", "here")).unwrap();

        let found = db.find_task(saved.id).unwrap();

        assert_eq!(found, Some(saved));
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        let db = setup_db();

        let found = db.find_task(12345).unwrap();

        assert!(found.is_none());
    }
}

mod recent_tests {
    use super::*;

    #[test]
    fn empty_store_gives_empty_list() {
        let db = setup_db();

        let tasks = db.recent_active_tasks().unwrap();

        assert!(tasks.is_empty());
    }

    #[test]
    fn returns_newest_first_capped_at_five() {
        let db = setup_db();

        for i in 1..=7 {
            db.save_task(&draft(&format!("Task {}", i), "sequence"))
                .unwrap();
            sleep(Duration::from_millis(2));
        }

        let titles: Vec<String> = db
            .recent_active_tasks()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, ["Task 7", "Task 6", "Task 5", "Task 4", "Task 3"]);
    }

    #[test]
    fn excludes_completed_tasks() {
        let db = setup_db();
        let active = db.save_task(&draft("Active", "stays")).unwrap();
        let done = db.save_task(&draft("Done", "goes")).unwrap();

        let mut update = done.to_draft();
        update.completed = true;
        db.save_task(&update).unwrap();

        let tasks = db.recent_active_tasks().unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, active.id);
    }

    #[test]
    fn same_millisecond_ties_list_latest_insert_first() {
        let db = setup_db();

        // No sleeps: several of these land on the same millisecond, where
        // the id tie-break must keep insertion order, newest first.
        for i in 1..=5 {
            db.save_task(&draft(&format!("Burst {}", i), "tie")).unwrap();
        }

        let ids: Vec<i64> = db
            .recent_active_tasks()
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();

        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn delete_all_removes_every_row() {
        let db = setup_db();
        db.save_task(&draft("One", "x")).unwrap();
        db.save_task(&draft("Two", "y")).unwrap();

        db.delete_all_tasks().unwrap();

        assert_eq!(db.count_tasks().unwrap(), 0);
        assert!(db.recent_active_tasks().unwrap().is_empty());
    }

    #[test]
    fn delete_all_is_idempotent() {
        let db = setup_db();

        db.delete_all_tasks().unwrap();
        db.delete_all_tasks().unwrap();

        assert_eq!(db.count_tasks().unwrap(), 0);
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn reopening_the_database_sees_saved_tasks() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tasks.db");

        let saved = {
            let db = Database::open(&path).expect("Failed to open database");
            db.save_task(&draft("Durable", "survives reopen")).unwrap()
        };

        let db = Database::open(&path).expect("Failed to reopen database");
        let found = db.find_task(saved.id).unwrap();

        assert_eq!(found, Some(saved));
    }
}
