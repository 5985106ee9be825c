//! Persistence adapter for the task list.
//!
//! A single JSON file (the "slot") holds the whole list across sessions. Loads
//! are tolerant: anything missing or malformed degrades to an empty list, and
//! individual elements are repaired field-by-field rather than rejected.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::task::Task;

/// The named storage slot holding the serialized task list.
#[derive(Debug, Clone)]
pub struct Slot {
    path: PathBuf,
}

impl Slot {
    pub fn new(path: &Path) -> Self {
        Slot { path: path.to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the task list from the slot. Never fails: a missing file, an
    /// unreadable file, a parse error, or a non-array payload all fall back to
    /// an empty list.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }
        let mut buf = String::new();
        if let Err(e) = File::open(&self.path).and_then(|mut f| f.read_to_string(&mut buf)) {
            eprintln!("Error reading {}, starting fresh: {e}", self.path.display());
            return Vec::new();
        }
        match serde_json::from_str::<Value>(&buf) {
            Ok(Value::Array(items)) => items.iter().map(coerce_task).collect(),
            Ok(_) => {
                eprintln!(
                    "Expected a JSON array in {}, starting fresh",
                    self.path.display()
                );
                Vec::new()
            }
            Err(e) => {
                eprintln!("Error parsing {}, starting fresh: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Save the full task list, overwriting the slot using an atomic write
    /// (temp file + rename). No partial writes, no versioning.
    pub fn save(&self, tasks: &[Task]) -> io::Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(tasks).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

/// Repair one persisted element into a complete task record.
///
/// Field-level defaulting: a missing or mistyped field gets a usable default
/// instead of failing the load. Unknown keys are ignored.
fn coerce_task(value: &Value) -> Task {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let text = value
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let completed = value
        .get("completed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let created_at = value
        .get("createdAt")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or_else(|| Utc::now().timestamp_millis());
    Task { id, text, completed, created_at }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_in(dir: &tempfile::TempDir) -> Slot {
        Slot::new(&dir.path().join("todos.json"))
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(slot_in(&dir).load().is_empty());
    }

    #[test]
    fn load_malformed_payloads_return_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot_in(&dir);
        for payload in ["not json at all", "{\"id\": \"1\"}", "42", "\"text\"", "null"] {
            fs::write(slot.path(), payload).unwrap();
            assert!(slot.load().is_empty(), "payload {payload:?} should load empty");
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot_in(&dir);
        let tasks = vec![
            Task { id: "1".into(), text: "a".into(), completed: false, created_at: 10 },
            Task { id: "2".into(), text: "b".into(), completed: true, created_at: 20 },
        ];
        slot.save(&tasks).unwrap();
        assert_eq!(slot.load(), tasks);
        // A second save of the loaded list is stable.
        slot.save(&slot.load()).unwrap();
        assert_eq!(slot.load(), tasks);
    }

    #[test]
    fn coercion_defaults_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot_in(&dir);
        fs::write(slot.path(), "[{}, {}]").unwrap();
        let tasks = slot.load();
        assert_eq!(tasks.len(), 2);
        assert_ne!(tasks[0].id, tasks[1].id, "defaulted ids must be unique");
        assert_eq!(tasks[0].text, "");
        assert!(!tasks[0].completed);
        assert!(tasks[0].created_at > 0);
    }

    #[test]
    fn coercion_ignores_unknown_keys_and_mistyped_fields() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot_in(&dir);
        fs::write(
            slot.path(),
            r#"[{"id": "1", "text": "a", "completed": "yes", "createdAt": 5, "color": "red"}]"#,
        )
        .unwrap();
        let tasks = slot.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].text, "a");
        assert!(!tasks[0].completed, "non-bool completed defaults to false");
        assert_eq!(tasks[0].created_at, 5);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let slot = slot_in(&dir);
        let first = vec![Task { id: "1".into(), text: "a".into(), completed: false, created_at: 1 }];
        slot.save(&first).unwrap();
        slot.save(&[]).unwrap();
        assert!(slot.load().is_empty());
    }
}
