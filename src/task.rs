//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single to-do
//! entry with its identity, text, completion flag, and creation time.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do entry.
///
/// Field names follow the persisted slot layout: the creation time is stored
/// under the `createdAt` key as milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Task {
    /// Create a new active task with a fresh unique id.
    ///
    /// The caller is expected to have trimmed and non-empty-checked `text`.
    pub fn new(text: &str) -> Self {
        Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_active_with_unique_id() {
        let a = Task::new("buy milk");
        let b = Task::new("buy milk");
        assert!(!a.completed);
        assert_eq!(a.text, "buy milk");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let task = Task {
            id: "1".into(),
            text: "a".into(),
            completed: false,
            created_at: 42,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["text"], "a");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], 42);
    }
}
