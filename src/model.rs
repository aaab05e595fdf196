//! Task records and the single JSON document they are stored in.
//!
//! All list mutations are expressed here as plain transforms on
//! [`TaskDocument`] so the HTTP layer only orchestrates load / transform /
//! save and the storage layer only moves bytes.

use serde::{Deserialize, Serialize};

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub task: String,
    pub status: bool,
}

/// The entire persisted collection, in insertion order.
///
/// Serializes as `{"todos": [...]}`, the on-disk shape of `db.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub todos: Vec<Task>,
}

impl TaskDocument {
    /// Append a new incomplete task and return a copy of the stored entry.
    ///
    /// The id is `current length + 1`, not `highest id + 1`. After deleting
    /// completed tasks, a later append can hand out an id that is still in
    /// use by a surviving entry.
    pub fn append(&mut self, text: impl Into<String>) -> Task {
        let entry = Task {
            id: self.todos.len() as u64 + 1,
            task: text.into(),
            status: false,
        };
        self.todos.push(entry.clone());
        entry
    }

    /// Mark every incomplete task with an even id as complete.
    /// Returns how many entries changed.
    pub fn complete_even_ids(&mut self) -> usize {
        let mut changed = 0;
        for entry in &mut self.todos {
            if entry.id % 2 == 0 && !entry.status {
                entry.status = true;
                changed += 1;
            }
        }
        changed
    }

    /// Remove every completed task, keeping the rest in order.
    /// Returns how many entries were removed.
    pub fn drop_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|entry| !entry.status);
        before - self.todos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, text: &str, status: bool) -> Task {
        Task {
            id,
            task: text.to_string(),
            status,
        }
    }

    #[test]
    fn append_starts_at_one_and_defaults_incomplete() {
        let mut doc = TaskDocument::default();
        let created = doc.append("buy milk");
        assert_eq!(created, task(1, "buy milk", false));
        let created = doc.append("walk dog");
        assert_eq!(created.id, 2);
        assert_eq!(doc.todos.len(), 2);
    }

    #[test]
    fn append_assigns_id_from_length_not_max_id() {
        let mut doc = TaskDocument {
            todos: vec![task(1, "a", true), task(2, "b", false)],
        };
        doc.drop_completed();
        // One survivor with id 2; the next append reuses id 2.
        let created = doc.append("c");
        assert_eq!(created.id, 2);
        assert_eq!(doc.todos[0].id, 2);
        assert_eq!(doc.todos[1].id, 2);
    }

    #[test]
    fn complete_even_ids_skips_odd_and_already_complete() {
        let mut doc = TaskDocument {
            todos: vec![
                task(1, "odd stays", false),
                task(2, "flips", false),
                task(3, "odd done stays done", true),
                task(4, "already done", true),
            ],
        };
        let changed = doc.complete_even_ids();
        assert_eq!(changed, 1);
        assert!(!doc.todos[0].status);
        assert!(doc.todos[1].status);
        assert!(doc.todos[2].status);
        assert!(doc.todos[3].status);
        assert_eq!(doc.todos[1].task, "flips");
    }

    #[test]
    fn complete_even_ids_on_empty_document_is_noop() {
        let mut doc = TaskDocument::default();
        assert_eq!(doc.complete_even_ids(), 0);
        assert!(doc.todos.is_empty());
    }

    #[test]
    fn drop_completed_preserves_order_of_survivors() {
        let mut doc = TaskDocument {
            todos: vec![
                task(1, "keep", false),
                task(2, "drop", true),
                task(3, "keep", false),
                task(4, "drop", true),
            ],
        };
        let removed = doc.drop_completed();
        assert_eq!(removed, 2);
        let ids: Vec<u64> = doc.todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn drop_completed_on_all_incomplete_removes_nothing() {
        let mut doc = TaskDocument {
            todos: vec![task(1, "a", false), task(2, "b", false)],
        };
        assert_eq!(doc.drop_completed(), 0);
        assert_eq!(doc.todos.len(), 2);
    }

    #[test]
    fn document_serializes_with_todos_field_and_declared_key_order() {
        let doc = TaskDocument {
            todos: vec![task(1, "buy milk", false)],
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"todos":[{"id":1,"task":"buy milk","status":false}]}"#
        );
    }

    #[test]
    fn document_round_trips_through_pretty_json() {
        let doc = TaskDocument {
            todos: vec![task(1, "a", false), task(2, "b", true)],
        };
        let pretty = serde_json::to_string_pretty(&doc).unwrap();
        let back: TaskDocument = serde_json::from_str(&pretty).unwrap();
        assert_eq!(back, doc);
    }
}
