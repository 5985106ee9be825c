//! Field types shared between the CLI and the TUI.

use clap::ValueEnum;

use crate::task::Task;

/// Visibility filter applied to the task list.
///
/// UI state only, never persisted; every session starts on `All`.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Whether a task passes this filter.
    pub fn admits(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}
