use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed todo list.
/// Storage defaults to ~/.todo/todos.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "Daily todo list for the terminal")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Defaults to the interactive UI when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
