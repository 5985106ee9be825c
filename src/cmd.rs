//! Command implementations for the CLI interface.
//!
//! This module contains the handlers for the scriptable subcommands, each a
//! thin wrapper over a `TaskStore` operation, plus the interactive UI entry
//! point. Mutating handlers report persistence failures to stderr and exit
//! nonzero; the in-memory state they mutated is simply discarded with the
//! process.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::Utc;

use crate::fields::Filter;
use crate::storage::Slot;
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::run::run_tui;
use crate::view;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// Task text. Leading and trailing whitespace is trimmed.
        text: String,
    },

    /// List tasks.
    List {
        /// Visibility filter: all | active | completed.
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },

    /// Toggle a task between active and completed.
    Toggle {
        /// Task id (unique prefix) or exact text.
        task: String,
    },

    /// Replace a task's text. Empty replacement text deletes the task.
    Rename {
        /// Task id (unique prefix) or exact text.
        task: String,
        /// The new text.
        text: String,
    },

    /// Delete a task.
    Delete {
        /// Task id (unique prefix) or exact text.
        task: String,
    },

    /// Remove all completed tasks.
    Clear,

    /// Complete every task, or reactivate everything when all are done.
    ToggleAll,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface on the given slot.
pub fn cmd_ui(slot: Slot) {
    if let Err(e) = run_tui(slot) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task at the front of the list.
pub fn cmd_add(store: &mut TaskStore, text: String) {
    match store.add(&text) {
        Ok(Some(id)) => println!("Added {}", short_id(&id)),
        Ok(None) => {
            eprintln!("Nothing to add: text is empty");
            std::process::exit(1);
        }
        Err(e) => fail_save(e),
    }
}

/// List tasks matching the filter, newest first, with a summary line.
pub fn cmd_list(store: &TaskStore, filter: Filter) {
    let tasks = view::visible(store.tasks(), filter);
    print_table(&tasks);
    println!("{}", view::items_left_label(store.tasks()));
}

/// Flip a task's completion flag.
pub fn cmd_toggle(store: &mut TaskStore, reference: &str) {
    let id = resolve_or_exit(reference, store);
    match store.toggle(&id) {
        Ok(true) => {
            if let Some(task) = store.get(&id) {
                if task.completed {
                    println!("Completed '{}'", task.text);
                } else {
                    println!("Reopened '{}'", task.text);
                }
            }
        }
        Ok(false) => not_found(reference),
        Err(e) => fail_save(e),
    }
}

/// Replace a task's text; empty text deletes it.
pub fn cmd_rename(store: &mut TaskStore, reference: &str, text: &str) {
    let id = resolve_or_exit(reference, store);
    match store.rename(&id, text) {
        Ok(true) => {
            if store.get(&id).is_some() {
                println!("Renamed {}", short_id(&id));
            } else {
                println!("Deleted {} (empty text)", short_id(&id));
            }
        }
        Ok(false) => not_found(reference),
        Err(e) => fail_save(e),
    }
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore, reference: &str) {
    let id = resolve_or_exit(reference, store);
    match store.delete(&id) {
        Ok(true) => println!("Deleted {}", short_id(&id)),
        Ok(false) => not_found(reference),
        Err(e) => fail_save(e),
    }
}

/// Remove every completed task.
pub fn cmd_clear(store: &mut TaskStore) {
    let before = store.tasks().len();
    match store.clear_completed() {
        Ok(true) => {
            let removed = before - store.tasks().len();
            println!(
                "Removed {} completed {}",
                removed,
                if removed == 1 { "task" } else { "tasks" }
            );
        }
        Ok(false) => println!("No completed tasks"),
        Err(e) => fail_save(e),
    }
}

/// Complete every task, or reactivate everything when all are done.
pub fn cmd_toggle_all(store: &mut TaskStore) {
    match store.toggle_all() {
        Ok(true) => {
            if store.tasks().iter().all(|t| t.completed) {
                println!("Completed all tasks");
            } else {
                println!("Reopened all tasks");
            }
        }
        Ok(false) => println!("No tasks"),
        Err(e) => fail_save(e),
    }
}

/// Print shell completion scripts to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = <crate::cli::Cli as clap::CommandFactory>::command();
    generate(shell, &mut cmd, "todo", &mut std::io::stdout());
}

/// Resolve a task reference to a full id.
///
/// Accepts a unique id prefix, or falls back to an exact (case-insensitive)
/// text match. Ambiguous references are an error naming the candidates.
pub fn resolve_task(reference: &str, store: &TaskStore) -> Result<String, String> {
    if reference.is_empty() {
        return Err("Empty task reference".to_string());
    }

    let by_prefix: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(reference))
        .collect();
    match by_prefix.len() {
        1 => return Ok(by_prefix[0].id.clone()),
        n if n > 1 => return Err(format!("Id prefix '{reference}' is ambiguous")),
        _ => {}
    }

    let by_text: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.text.eq_ignore_ascii_case(reference))
        .collect();
    match by_text.len() {
        0 => Err(format!("No task matches '{reference}'")),
        1 => Ok(by_text[0].id.clone()),
        _ => {
            let mut msg = format!("Multiple tasks have the text '{reference}':\n");
            for task in by_text {
                msg.push_str(&format!("  {}  {}\n", short_id(&task.id), task.text));
            }
            msg.push_str("Please use the id instead.");
            Err(msg)
        }
    }
}

fn resolve_or_exit(reference: &str, store: &TaskStore) -> String {
    match resolve_task(reference, store) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn not_found(reference: &str) -> ! {
    eprintln!("No task matches '{reference}'");
    std::process::exit(1);
}

fn fail_save(e: std::io::Error) -> ! {
    eprintln!("Failed to save: {e}");
    std::process::exit(1);
}

/// Leading segment of a UUID, enough to address tasks interactively.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[&Task]) {
    println!("{:<10} {:<5} {:<10} {}", "ID", "Done", "Age", "Text");
    let now = Utc::now().timestamp_millis();
    for t in tasks {
        println!(
            "{:<10} {:<5} {:<10} {}",
            short_id(&t.id),
            if t.completed { "[x]" } else { "[ ]" },
            view::format_age(t.created_at, now),
            t.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TaskStore::open(Slot::new(&dir.path().join("todos.json")));
        store.add("buy milk").unwrap();
        store.add("walk dog").unwrap();
        (dir, store)
    }

    #[test]
    fn resolves_unique_id_prefix() {
        let (_dir, store) = seeded();
        let id = store.tasks()[0].id.clone();
        assert_eq!(resolve_task(&id[..8], &store).unwrap(), id);
        assert_eq!(resolve_task(&id, &store).unwrap(), id);
    }

    #[test]
    fn resolves_exact_text_case_insensitively() {
        let (_dir, store) = seeded();
        let id = resolve_task("Buy Milk", &store).unwrap();
        assert_eq!(store.get(&id).unwrap().text, "buy milk");
    }

    #[test]
    fn rejects_unknown_and_empty_references() {
        let (_dir, store) = seeded();
        assert!(resolve_task("no-such-task", &store).is_err());
        assert!(resolve_task("", &store).is_err());
    }
}
