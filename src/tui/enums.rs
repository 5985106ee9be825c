//! Enumerations for TUI state management.

/// Top-level interaction mode for the terminal user interface.
///
/// `Edit` carries no payload here; the id being edited and its buffer live on
/// the `App` so that at most one item is editable at a time.
#[derive(Clone, Copy, PartialEq)]
pub enum Mode {
    /// Navigating the task list.
    Browse,
    /// Typing into the new-task input.
    Entry,
    /// Editing the text of the selected task in place.
    Edit,
}
