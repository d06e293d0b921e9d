//! Resolve command for marking an issue as done from its detail page

use clap::Args;
use kanban_core::{Notification, ResolveOutcome, resolve_issue};

use crate::context::BoardContext;
use crate::error::CliResult;
use crate::output::format_notifications;

/// Mark an issue as resolved
#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Issue ID, e.g. ISSUE-001
    #[arg(required = true)]
    pub id: String,
}

#[derive(Debug)]
pub struct ResolveResult {
    pub id: String,
    pub outcome: ResolveOutcome,
    pub notifications: Vec<Notification>,
}

impl std::fmt::Display for ResolveResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            ResolveOutcome::AlreadyDone => write!(f, "Issue '{}' is already done", self.id),
            ResolveOutcome::Resolved(_) => {
                write!(f, "{}", format_notifications(&self.notifications))
            }
        }
    }
}

impl ResolveCommand {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Transition` if the user may not resolve issues or
    /// the issue is unknown, and `CliError::Engine` if loading or saving
    /// fails.
    pub async fn execute(&self, ctx: &BoardContext) -> CliResult<ResolveResult> {
        ctx.engine.hydrate().await?;
        let outcome = resolve_issue(&ctx.engine, &ctx.notifications, &ctx.user, &self.id).await?;
        Ok(ResolveResult {
            id: self.id.clone(),
            outcome,
            notifications: ctx.notifications.history(),
        })
    }
}
