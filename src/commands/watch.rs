//! Watch command for polling the repository and reprinting the board

use std::time::Duration;

use clap::Args;
use kanban_core::DEFAULT_SYNC_INTERVAL;
use tracing::warn;

use super::board::BoardSnapshot;
use crate::context::BoardContext;
use crate::error::CliResult;

/// Poll the issue source and print the board on every sync
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Seconds between syncs
    #[arg(long, default_value_t = DEFAULT_SYNC_INTERVAL.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Stop after this many syncs (runs until interrupted if omitted)
    #[arg(long)]
    pub ticks: Option<usize>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct WatchResult {
    pub syncs: usize,
    pub failures: usize,
}

impl std::fmt::Display for WatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stopped after {} syncs ({} failed)",
            self.syncs, self.failures
        )
    }
}

impl WatchCommand {
    /// Execute the watch command, writing each rendering to `out`.
    ///
    /// A failed sync is printed and polling continues.
    pub async fn execute_with<F>(&self, ctx: &BoardContext, mut out: F) -> CliResult<WatchResult>
    where
        F: FnMut(String),
    {
        let mut result = WatchResult {
            syncs: 0,
            failures: 0,
        };

        ctx.engine
            .sync_every(
                Duration::from_secs(self.interval_secs),
                self.ticks,
                |engine, synced| {
                    result.syncs += 1;
                    if let Err(e) = synced {
                        warn!("Sync failed: {}", e.full_message());
                        result.failures += 1;
                    }
                    out(BoardSnapshot::capture(engine, &ctx.user).to_string());
                },
            )
            .await;

        Ok(result)
    }

    /// Execute the watch command, printing to stdout.
    pub async fn execute(&self, ctx: &BoardContext) -> CliResult<WatchResult> {
        self.execute_with(ctx, |board| println!("{}\n", board)).await
    }
}
