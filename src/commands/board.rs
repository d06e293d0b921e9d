//! Board command for showing the filtered, priority-sorted board
//!
//! Implements `kanban board` with search, assignee and severity filters.

use chrono::{DateTime, Utc};
use clap::Args;
use kanban_core::{
    BoardColumns, FilterOptions, FilterPatch, IssueEngine, User, permissions::is_read_only,
};

use crate::context::BoardContext;
use crate::error::CliResult;
use crate::output::{format_columns, format_filters, format_last_synced};

/// Show the board
#[derive(Debug, Args)]
pub struct BoardCommand {
    /// Case-insensitive text matched against titles and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only issues assigned to this person
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Only issues with this severity (1-5)
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
    pub severity: Option<i32>,
}

/// Point-in-time rendering input for the board
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub columns: BoardColumns,
    pub filters: FilterOptions,
    pub assignees: Vec<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub read_only: bool,
    pub error: Option<String>,
    pub now: DateTime<Utc>,
}

impl BoardSnapshot {
    pub fn capture(engine: &IssueEngine, user: &User) -> Self {
        Self {
            columns: engine.columns(),
            filters: engine.filters(),
            assignees: engine.assignees(),
            last_synced_at: engine.last_synced_at(),
            read_only: is_read_only(user),
            error: engine.error(),
            now: engine.now(),
        }
    }
}

impl std::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", format_last_synced(self.last_synced_at))?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        if self.read_only {
            writeln!(f, "Read-only: your role cannot move issues")?;
        }
        if let Some(filters) = format_filters(&self.filters) {
            writeln!(f, "{}", filters)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", format_columns(&self.columns, self.now))?;
        writeln!(f)?;
        write!(f, "Assignees: {}", self.assignees.join(", "))
    }
}

impl BoardCommand {
    /// Filter patch described by the flags
    pub fn patch(&self) -> FilterPatch {
        FilterPatch {
            search_query: self.search.clone(),
            assignee: self.assignee.clone().map(Some),
            severity: self.severity.map(Some),
        }
    }

    /// Execute the board command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Engine` if the issues cannot be fetched.
    pub async fn execute(&self, ctx: &BoardContext) -> CliResult<BoardSnapshot> {
        ctx.engine.hydrate().await?;
        ctx.engine.set_filters(self.patch());
        Ok(BoardSnapshot::capture(&ctx.engine, &ctx.user))
    }
}
