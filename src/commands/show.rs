//! Show command for displaying one issue's detail page

use clap::Args;
use kanban_core::{IssueDetail, load_detail};

use crate::context::BoardContext;
use crate::error::{CliError, CliResult};
use crate::output::format_detail;

/// Show the detail page of an issue
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Issue ID, e.g. ISSUE-001
    #[arg(required = true)]
    pub id: String,
}

#[derive(Debug)]
pub struct ShowResult {
    pub detail: IssueDetail,
}

impl std::fmt::Display for ShowResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_detail(&self.detail))
    }
}

impl ShowCommand {
    /// Execute the show command.
    ///
    /// Reads straight from the repository; the board is not hydrated.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IssueNotFound` for an unknown id and
    /// `CliError::Engine` if the lookup fails.
    pub async fn execute(&self, ctx: &BoardContext) -> CliResult<ShowResult> {
        let detail = load_detail(&ctx.engine, &ctx.notifications, &ctx.user, &self.id)
            .await?
            .ok_or_else(|| CliError::IssueNotFound {
                issue_id: self.id.clone(),
            })?;
        Ok(ShowResult { detail })
    }
}
