//! Issue repository boundary
//!
//! The engine talks to its backend only through [`IssueRepository`]. Calls
//! are asynchronous, may fail, and are never retried here.

mod memory;
mod update;

pub use memory::{DEFAULT_LATENCY, FailureMode, InMemoryRepository};
pub use update::IssueUpdate;

use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::Issue;

/// Asynchronous source of truth for issues.
///
/// Futures are not `Send`: the board runs on a single cooperative thread.
#[async_trait(?Send)]
pub trait IssueRepository {
    /// Fetch every issue, in the repository's own order.
    async fn fetch_all(&self) -> RepositoryResult<Vec<Issue>>;

    /// Fetch one issue, `None` when the id is unknown.
    async fn fetch_by_id(&self, id: &str) -> RepositoryResult<Option<Issue>>;

    /// Apply a partial update and return the canonical issue.
    ///
    /// The repository stamps `updated_at`. Fails with `NotFound` for an
    /// unknown id and `Transient` on backend failure.
    async fn update(&self, id: &str, update: &IssueUpdate) -> RepositoryResult<Issue>;
}
