//! CLI commands for the kanban board
//!
//! This module contains all subcommand implementations for the kanban CLI.

pub mod board;
pub mod move_issue;
pub mod resolve;
pub mod show;
pub mod watch;

pub use board::{BoardCommand, BoardSnapshot};
pub use move_issue::{MoveCommand, StatusArg};
pub use resolve::ResolveCommand;
pub use show::ShowCommand;
pub use watch::WatchCommand;

use clap::Subcommand;

use crate::context::BoardContext;
use crate::error::CliResult;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the board, optionally filtered
    Board(BoardCommand),

    /// Show one issue
    Show(ShowCommand),

    /// Move an issue to another column
    Move(MoveCommand),

    /// Mark an issue as resolved
    Resolve(ResolveCommand),

    /// Re-sync periodically and print the board each time
    Watch(WatchCommand),
}

impl Command {
    /// Execute the command against the board.
    ///
    /// Returns the text to print.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the command execution fails.
    pub async fn execute(&self, ctx: &BoardContext) -> CliResult<String> {
        match self {
            Command::Board(cmd) => cmd.execute(ctx).await.map(|r| r.to_string()),
            Command::Show(cmd) => cmd.execute(ctx).await.map(|r| r.to_string()),
            Command::Move(cmd) => cmd.execute(ctx).await.map(|r| r.to_string()),
            Command::Resolve(cmd) => cmd.execute(ctx).await.map(|r| r.to_string()),
            Command::Watch(cmd) => cmd.execute(ctx).await.map(|r| r.to_string()),
        }
    }
}
