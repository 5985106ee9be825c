//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store and the
//! active filter, handles user input, and rebuilds the interface from scratch
//! on every change.

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

use crate::fields::Filter;
use crate::storage::Slot;
use crate::store::TaskStore;
use crate::tui::{
    colors::{ACCENT, DIM},
    enums::Mode,
    input::InputField,
};
use crate::view::{self, ItemMode};

/// Main application state for the terminal user interface.
///
/// The store and the filter live here and are passed by reference into the
/// render functions; nothing is kept in globals.
pub struct App {
    store: TaskStore,
    filter: Filter,
    mode: Mode,
    new_task: InputField,
    edit_id: Option<String>,
    edit_field: InputField,
    visible_ids: Vec<String>,
    list_state: TableState,
    status_message: String,
    seen_revision: u64,
}

impl App {
    /// Create a new App instance over the given storage slot.
    pub fn new(slot: Slot) -> Self {
        let store = TaskStore::open(slot);
        let mut app = App {
            store,
            filter: Filter::All,
            mode: Mode::Browse,
            new_task: InputField::new(),
            edit_id: None,
            edit_field: InputField::new(),
            visible_ids: Vec::new(),
            list_state: TableState::default(),
            status_message: String::new(),
            seen_revision: 0,
        };
        app.rebuild_rows();
        app
    }

    /// Rebuild the visible id list from the store and the active filter,
    /// preserving the selection where possible.
    fn rebuild_rows(&mut self) {
        let old_selected_id = self
            .list_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .cloned();

        self.visible_ids = view::visible(self.store.tasks(), self.filter)
            .iter()
            .map(|t| t.id.clone())
            .collect();

        if let Some(old_id) = old_selected_id {
            if let Some(new_idx) = self.visible_ids.iter().position(|id| *id == old_id) {
                self.list_state.select(Some(new_idx));
            } else if self.visible_ids.is_empty() {
                self.list_state.select(None);
            } else {
                let last = self.visible_ids.len() - 1;
                let idx = self.list_state.selected().unwrap_or(0).min(last);
                self.list_state.select(Some(idx));
            }
        } else if !self.visible_ids.is_empty() {
            self.list_state.select(Some(0));
        } else {
            self.list_state.select(None);
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .cloned()
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Switch the visibility filter. Selecting the already-active filter is a
    /// no-op.
    fn set_filter(&mut self, filter: Filter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.rebuild_rows();
    }

    fn cycle_filter(&mut self) {
        self.set_filter(match self.filter {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        });
    }

    fn select_next(&mut self) {
        if self.visible_ids.is_empty() {
            return;
        }
        let idx = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.visible_ids.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(idx));
    }

    fn select_previous(&mut self) {
        if self.visible_ids.is_empty() {
            return;
        }
        let idx = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(idx));
    }

    /// Enter edit mode on the selected task, cursor at the end of its text.
    fn begin_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_message("No task selected".to_string());
            return;
        };
        if let Some(task) = self.store.get(&id) {
            self.edit_field = InputField::with_value(&task.text);
            self.edit_id = Some(id);
            self.mode = Mode::Edit;
        }
    }

    /// Commit the edit buffer via rename. An emptied buffer deletes the task.
    fn commit_edit(&mut self) {
        if let Some(id) = self.edit_id.take() {
            if let Err(e) = self.store.rename(&id, &self.edit_field.value) {
                self.set_status_message(format!("Save failed: {e}"));
            }
        }
        self.mode = Mode::Browse;
    }

    /// Leave edit mode without touching the store; the next rebuild restores
    /// the original text.
    fn cancel_edit(&mut self) {
        self.edit_id = None;
        self.mode = Mode::Browse;
    }

    /// Read the new-task input, add it, and clear the input for the next
    /// entry. Blank input adds nothing.
    fn submit_new_task(&mut self) {
        if let Err(e) = self.store.add(&self.new_task.value) {
            self.set_status_message(format!("Save failed: {e}"));
        }
        self.new_task.clear();
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Err(e) = self.store.toggle(&id) {
                self.set_status_message(format!("Save failed: {e}"));
            }
        }
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Err(e) = self.store.delete(&id) {
                self.set_status_message(format!("Save failed: {e}"));
            }
        }
    }

    fn clear_completed(&mut self) {
        match self.store.clear_completed() {
            Ok(true) => self.set_status_message("Cleared completed tasks".to_string()),
            Ok(false) => {}
            Err(e) => self.set_status_message(format!("Save failed: {e}")),
        }
    }

    fn toggle_all(&mut self) {
        if let Err(e) = self.store.toggle_all() {
            self.set_status_message(format!("Save failed: {e}"));
        }
    }

    /// Handle keyboard input when browsing the task list.
    ///
    /// Returns true if the application should quit.
    fn handle_browse_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('n') | KeyCode::Char('i') => self.mode = Mode::Entry,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') => self.clear_completed(),
            KeyCode::Char('t') => self.toggle_all(),
            KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Active),
            KeyCode::Char('3') => self.set_filter(Filter::Completed),
            KeyCode::Tab => self.cycle_filter(),
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input while typing into the new-task field.
    fn handle_entry_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => self.submit_new_task(),
            KeyCode::Char(c) => self.new_task.handle_char(c),
            KeyCode::Backspace => self.new_task.handle_backspace(),
            KeyCode::Delete => self.new_task.handle_delete(),
            KeyCode::Left => self.new_task.move_cursor_left(),
            KeyCode::Right => self.new_task.move_cursor_right(),
            KeyCode::Home => self.new_task.move_cursor_home(),
            KeyCode::End => self.new_task.move_cursor_end(),
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input while editing the selected task in place.
    fn handle_edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Char(c) => self.edit_field.handle_char(c),
            KeyCode::Backspace => self.edit_field.handle_backspace(),
            KeyCode::Delete => self.edit_field.handle_delete(),
            KeyCode::Left => self.edit_field.move_cursor_left(),
            KeyCode::Right => self.edit_field.move_cursor_right(),
            KeyCode::Home => self.edit_field.move_cursor_home(),
            KeyCode::End => self.edit_field.move_cursor_end(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = match self.mode {
                    Mode::Browse => self.handle_browse_input(key.code, key.modifiers)?,
                    Mode::Entry => self.handle_entry_input(key.code, key.modifiers)?,
                    Mode::Edit => self.handle_edit_input(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render an input field's value with a block cursor.
    fn input_line(field: &InputField) -> Line<'static> {
        let (before, after) = field.split_at_cursor();
        let mut rest = after.chars();
        let at_cursor = rest.next().map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled(at_cursor, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(rest.as_str().to_string()),
        ])
    }

    /// Render the new-task input box.
    fn render_entry(&mut self, f: &mut Frame, area: Rect) {
        let focused = self.mode == Mode::Entry;
        let border_style = if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        };
        let content = if focused {
            Self::input_line(&self.new_task)
        } else if self.new_task.value.is_empty() {
            Line::from(Span::styled(
                "press 'n' to add a task",
                Style::default().fg(DIM),
            ))
        } else {
            Line::from(self.new_task.value.clone())
        };
        let input = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("What needs to be done?"),
        );
        f.render_widget(input, area);
    }

    /// Render the visible task list, rebuilt in full from the view-model.
    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let now = Utc::now().timestamp_millis();
        let rows: Vec<Row> = view::rows(self.store.tasks(), self.filter, self.edit_id.as_deref())
            .iter()
            .map(|item| {
                let mark = if item.task.completed { "[x]" } else { "[ ]" };
                let text_cell = match item.mode {
                    ItemMode::Editing => Cell::from(Self::input_line(&self.edit_field))
                        .style(Style::default().fg(ACCENT)),
                    ItemMode::Viewing if item.task.completed => {
                        Cell::from(item.task.text.clone()).style(
                            Style::default().fg(DIM).add_modifier(Modifier::CROSSED_OUT),
                        )
                    }
                    ItemMode::Viewing => Cell::from(item.task.text.clone()),
                };
                Row::new(vec![
                    Cell::from(mark),
                    text_cell,
                    Cell::from(view::format_age(item.task.created_at, now))
                        .style(Style::default().fg(DIM)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(12),
        ];

        let table = Table::new(rows, widths)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{})",
                self.visible_ids.len(),
                self.store.tasks().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    /// Render the summary count and the filter controls.
    fn render_footer(&mut self, f: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                view::items_left_label(self.store.tasks()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
        ];
        for (i, filter) in [Filter::All, Filter::Active, Filter::Completed]
            .into_iter()
            .enumerate()
        {
            let label = format!("[{}] {}", i + 1, view::format_filter(filter));
            if filter == self.filter {
                spans.push(Span::styled(
                    label,
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw(label));
            }
            spans.push(Span::raw("  "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the status bar: the current message, or the key legend.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let line = if self.status_message.is_empty() {
            match self.mode {
                Mode::Browse => {
                    "n new · Space toggle · e edit · d delete · c clear done · t toggle all · q quit"
                }
                Mode::Entry => "Enter add · Esc back",
                Mode::Edit => "Enter save · Esc cancel",
            }
            .to_string()
        } else {
            self.status_message.clone()
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(line, Style::default().fg(DIM)))),
            area,
        );
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(f.area());

        self.render_entry(f, chunks[0]);
        self.render_list(f, chunks[1]);
        self.render_footer(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Rebuilds the visible rows whenever the store committed a mutation, then
    /// redraws and processes input until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            if self.store.revision() != self.seen_revision {
                self.seen_revision = self.store.revision();
                self.rebuild_rows();
            }

            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
