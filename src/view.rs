//! Pure view derivation over the task list.
//!
//! Everything here is a function of (tasks, filter, edit state) with no access
//! to the terminal, so the visible list and the summary line can be tested
//! without a live presentation surface. The TUI rebuilds its widgets from
//! these values on every draw.

use crate::fields::Filter;
use crate::task::Task;

/// Per-item interaction mode, tagged onto each visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMode {
    Viewing,
    Editing,
}

/// One visible row handed to the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct ItemRow<'a> {
    pub task: &'a Task,
    pub mode: ItemMode,
}

/// Tasks passing the filter, in store order.
pub fn visible(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.admits(t)).collect()
}

/// The view-model for one frame: every visible task, with at most one row
/// tagged as editing.
pub fn rows<'a>(tasks: &'a [Task], filter: Filter, editing: Option<&str>) -> Vec<ItemRow<'a>> {
    visible(tasks, filter)
        .into_iter()
        .map(|task| ItemRow {
            task,
            mode: if editing == Some(task.id.as_str()) {
                ItemMode::Editing
            } else {
                ItemMode::Viewing
            },
        })
        .collect()
}

/// Count of not-completed tasks, regardless of the active filter.
pub fn items_left(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.completed).count()
}

/// Summary line for the footer: "1 item left" / "N items left".
pub fn items_left_label(tasks: &[Task]) -> String {
    let left = items_left(tasks);
    if left == 1 {
        "1 item left".to_string()
    } else {
        format!("{left} items left")
    }
}

/// Format a filter for the control surface.
pub fn format_filter(f: Filter) -> &'static str {
    match f {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}

/// Format a task's age relative to now ("just now", "5m ago", "3h ago").
///
/// Both arguments are milliseconds since the Unix epoch.
pub fn format_age(created_at: i64, now: i64) -> String {
    let secs = ((now - created_at) / 1000).max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
