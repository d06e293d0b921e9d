//! Move command simulating a drag of a card onto another column
//!
//! Runs the same gesture flow as the board: permission check, optimistic
//! move, undoable notification, persist, and rollback on failure.

use clap::{Args, ValueEnum};
use kanban_core::{DropOutcome, IssueStatus, Notification, UndoOutcome};

use super::board::BoardSnapshot;
use crate::context::BoardContext;
use crate::error::CliResult;
use crate::output::format_notifications;

/// Target column on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Backlog,
    InProgress,
    Done,
}

impl From<StatusArg> for IssueStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Backlog => IssueStatus::Backlog,
            StatusArg::InProgress => IssueStatus::InProgress,
            StatusArg::Done => IssueStatus::Done,
        }
    }
}

/// Move an issue to another column
#[derive(Debug, Args)]
pub struct MoveCommand {
    /// Issue ID, e.g. ISSUE-001
    #[arg(required = true)]
    pub id: String,

    /// Column to drop the issue on
    #[arg(value_enum)]
    pub status: StatusArg,

    /// Undo the move right after it completes
    #[arg(long)]
    pub undo: bool,
}

#[derive(Debug)]
pub struct MoveResult {
    pub outcome: DropOutcome,
    pub undo: Option<UndoOutcome>,
    pub notifications: Vec<Notification>,
    pub board: BoardSnapshot,
}

impl std::fmt::Display for MoveResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            DropOutcome::Cancelled => writeln!(f, "Issue is already in that column")?,
            DropOutcome::Persisted(issue) => {
                writeln!(f, "Saved {} as {}", issue.id, issue.status.label())?
            }
            DropOutcome::Superseded => writeln!(f, "Move superseded by a later change")?,
            DropOutcome::Reverted(err) => writeln!(f, "Move reverted: {}", err.full_message())?,
        }
        if self.undo == Some(UndoOutcome::Unavailable) {
            writeln!(f, "Nothing to undo")?;
        }
        if !self.notifications.is_empty() {
            writeln!(f, "{}", format_notifications(&self.notifications))?;
        }
        writeln!(f)?;
        write!(f, "{}", self.board)
    }
}

impl MoveCommand {
    /// Execute the move command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Engine` if the board cannot be loaded and
    /// `CliError::Transition` if the user may not move issues or the issue
    /// is not on the board. A failed persist is not an error: the move is
    /// reverted and reported in the result.
    pub async fn execute(&self, ctx: &BoardContext) -> CliResult<MoveResult> {
        ctx.engine.hydrate().await?;
        let drag = ctx.controller();

        drag.begin_drag(&self.id)?;
        let outcome = drag.end_drag(Some(self.status.into())).await?;

        let undo = if self.undo {
            let moved = ctx
                .notifications
                .active()
                .into_iter()
                .find(|n| n.undo.is_some())
                .map(|n| n.id);
            Some(moved.map_or(UndoOutcome::Unavailable, |id| drag.undo(id)))
        } else {
            None
        };

        Ok(MoveResult {
            outcome,
            undo,
            notifications: ctx.notifications.history(),
            board: BoardSnapshot::capture(&ctx.engine, &ctx.user),
        })
    }
}
