//! In-memory task store and its mutation operations.
//!
//! The `TaskStore` owns the ordered task list for the life of the process.
//! Every effective mutation runs a commit: the full list is written to the
//! slot first, then the revision counter is bumped so the view layer knows to
//! rebuild. No-op mutations (unknown id, empty input, nothing to clear) skip
//! the commit entirely.

use std::io;

use crate::storage::Slot;
use crate::task::Task;

/// Owns the task list and the persisted slot behind it.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    slot: Slot,
    revision: u64,
}

impl TaskStore {
    /// Open a store on the given slot, loading whatever it holds.
    pub fn open(slot: Slot) -> Self {
        let tasks = slot.load();
        TaskStore { tasks, slot, revision: 0 }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Commit counter: bumped once per persisted mutation. The view layer
    /// rebuilds whenever this changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a new task at the front of the list. Returns the new task's id, or
    /// `None` (without committing) when the trimmed text is empty.
    pub fn add(&mut self, text: &str) -> io::Result<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let task = Task::new(text);
        let id = task.id.clone();
        self.tasks.insert(0, task);
        self.commit()?;
        Ok(Some(id))
    }

    /// Flip the completion flag on the matching task. `Ok(false)` when the id
    /// is unknown.
    pub fn toggle(&mut self, id: &str) -> io::Result<bool> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                self.commit()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the matching task. `Ok(false)` when the id is unknown.
    pub fn delete(&mut self, id: &str) -> io::Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Replace the matching task's text. An empty trimmed replacement deletes
    /// the task instead; the text of a live record is never empty.
    pub fn rename(&mut self, id: &str, new_text: &str) -> io::Result<bool> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return self.delete(id);
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.text = new_text.to_string();
                self.commit()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every completed task. `Ok(false)` — and no write, no render
    /// request — when nothing was completed.
    pub fn clear_completed(&mut self) -> io::Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Mark every task completed, or every task active when all are already
    /// completed. `Ok(false)` on an empty list.
    pub fn toggle_all(&mut self) -> io::Result<bool> {
        if self.tasks.is_empty() {
            return Ok(false);
        }
        let target = !self.tasks.iter().all(|t| t.completed);
        for task in self.tasks.iter_mut() {
            task.completed = target;
        }
        self.commit()?;
        Ok(true)
    }

    /// Persist the full list, then request a render. Write happens-before the
    /// revision bump so a rebuilt view never shows unpersisted state.
    fn commit(&mut self) -> io::Result<()> {
        self.slot.save(&self.tasks)?;
        self.revision += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_in(dir: &tempfile::TempDir) -> TaskStore {
        TaskStore::open(Slot::new(&dir.path().join("todos.json")))
    }

    fn slot_bytes(dir: &tempfile::TempDir) -> Vec<u8> {
        fs::read(dir.path().join("todos.json")).unwrap_or_default()
    }

    #[test]
    fn add_blank_text_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(store.add("").unwrap(), None);
        assert_eq!(store.add("   ").unwrap(), None);
        assert!(store.tasks().is_empty());
        assert_eq!(store.revision(), 0);
        assert!(!dir.path().join("todos.json").exists());
    }

    #[test]
    fn add_trims_and_inserts_at_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let first = store.add("  buy milk  ").unwrap().unwrap();
        let second = store.add("walk dog").unwrap().unwrap();
        assert_eq!(store.tasks()[0].id, second);
        assert_eq!(store.tasks()[1].id, first);
        assert_eq!(store.tasks()[1].text, "buy milk");
        assert!(!store.tasks()[0].completed);
        assert_ne!(first, second);
    }

    #[test]
    fn newest_first_ordering() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("x").unwrap();
        store.add("y").unwrap();
        let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["y", "x"]);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let id = store.add("a").unwrap().unwrap();
        assert!(store.toggle(&id).unwrap());
        assert!(store.tasks()[0].completed);
        assert!(store.toggle(&id).unwrap());
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("a").unwrap();
        let persisted = slot_bytes(&dir);
        let revision = store.revision();
        assert!(!store.toggle("no-such-id").unwrap());
        assert_eq!(store.revision(), revision);
        assert_eq!(slot_bytes(&dir), persisted);
    }

    #[test]
    fn rename_updates_text_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("a").unwrap();
        let id = store.add("b").unwrap().unwrap();
        assert!(store.rename(&id, "  c  ").unwrap());
        assert_eq!(store.tasks()[0].text, "c");
        // Order is untouched by rename.
        assert_eq!(store.tasks()[1].text, "a");
        assert!(!store.rename("no-such-id", "d").unwrap());
    }

    #[test]
    fn rename_to_empty_deletes_the_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let id = store.add("a").unwrap().unwrap();
        assert!(store.rename(&id, "   ").unwrap());
        assert!(store.tasks().is_empty());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn delete_removes_matching_task_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let a = store.add("a").unwrap().unwrap();
        let b = store.add("b").unwrap().unwrap();
        assert!(store.delete(&a).unwrap());
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, b);
        assert!(!store.delete(&a).unwrap());
    }

    #[test]
    fn clear_completed_with_none_completed_skips_the_commit() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("a").unwrap();
        store.add("b").unwrap();
        let persisted = slot_bytes(&dir);
        let revision = store.revision();
        assert!(!store.clear_completed().unwrap());
        assert_eq!(store.revision(), revision, "no render request");
        assert_eq!(slot_bytes(&dir), persisted, "no persistence write");
    }

    #[test]
    fn clear_completed_removes_only_completed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let a = store.add("a").unwrap().unwrap();
        let b = store.add("b").unwrap().unwrap();
        store.toggle(&b).unwrap();
        assert!(store.clear_completed().unwrap());
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, a);
    }

    #[test]
    fn toggle_all_flips_the_whole_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(!store.toggle_all().unwrap(), "empty list is a no-op");
        let a = store.add("a").unwrap().unwrap();
        store.add("b").unwrap();
        store.toggle(&a).unwrap();
        assert!(store.toggle_all().unwrap());
        assert!(store.tasks().iter().all(|t| t.completed));
        assert!(store.toggle_all().unwrap());
        assert!(store.tasks().iter().all(|t| !t.completed));
    }

    #[test]
    fn mutations_are_persisted_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let a = store.add("a").unwrap().unwrap();
        store.add("b").unwrap();
        store.toggle(&a).unwrap();
        let reopened = store_in(&dir);
        assert_eq!(reopened.tasks(), store.tasks());
    }
}
