//! # todo - Terminal Todo List
//!
//! A file-backed todo list with a scriptable CLI and an interactive terminal
//! user interface (TUI).
//!
//! ## Key Features
//!
//! - **Rapid Capture**: Add, edit, complete, and delete short text items from
//!   the command line or the TUI without leaving the terminal
//! - **Visibility Filters**: All / Active / Completed views over one list
//! - **Local File Storage**: A single JSON file, written atomically on every
//!   change and tolerant of malformed contents on load
//! - **Multiple Interfaces**: Full CLI for automation + interactive TUI for
//!   visual management
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! todo
//!
//! # Add a task via CLI
//! todo add "Buy milk"
//!
//! # List active tasks
//! todo list --filter active
//!
//! # Complete a task by id prefix or exact text
//! todo toggle "Buy milk"
//!
//! # Drop everything you finished
//! todo clear
//! ```
//!
//! ## Installation
//!
//! ```bash
//! git clone <repository-url>
//! cd todo_list
//! cargo install --path .
//! ```
//!
//! Data is stored locally in `~/.todo/todos.json` (override with `--db`).
//! We recommend you source control this folder via `git init` and back it up
//! periodically.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use storage::Slot;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Determine the database file to use
    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let todo_dir = PathBuf::from(home).join(".todo");
        if let Err(e) = std::fs::create_dir_all(&todo_dir) {
            eprintln!("Failed to create data directory {}: {}", todo_dir.display(), e);
            std::process::exit(1);
        }
        todo_dir.join("todos.json")
    });

    // Handle commands that don't need a loaded store first
    match &cli.command {
        None | Some(Commands::Ui) => {
            cmd_ui(Slot::new(&db_path));
            return;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(*shell);
            return;
        }
        _ => {}
    }

    let mut store = TaskStore::open(Slot::new(&db_path));

    match cli.command.expect("bare invocation handled above") {
        Commands::Ui | Commands::Completions { .. } => unreachable!("handled above"),

        Commands::Add { text } => cmd_add(&mut store, text),

        Commands::List { filter } => cmd_list(&store, filter),

        Commands::Toggle { task } => cmd_toggle(&mut store, &task),

        Commands::Rename { task, text } => cmd_rename(&mut store, &task, &text),

        Commands::Delete { task } => cmd_delete(&mut store, &task),

        Commands::Clear => cmd_clear(&mut store),

        Commands::ToggleAll => cmd_toggle_all(&mut store),
    }
}
