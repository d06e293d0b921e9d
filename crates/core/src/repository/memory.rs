//! In-memory issue repository
//!
//! Stand-in backend for the board: seeded from a list of issues or a JSON
//! document, answers after a simulated network delay, and can be told to
//! fail so revert paths can be exercised.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use super::{IssueRepository, IssueUpdate};
use crate::clock::{Clock, SystemClock};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::Issue;

/// Simulated round-trip time for every call
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// When a class of calls should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    Never,
    /// Fail the next `n` calls, then recover
    Next(usize),
    Always,
}

impl FailureMode {
    /// Consume one call; returns whether it fails.
    fn trip(&mut self) -> bool {
        match self {
            FailureMode::Never => false,
            FailureMode::Always => true,
            FailureMode::Next(0) => {
                *self = FailureMode::Never;
                false
            }
            FailureMode::Next(n) => {
                *n -= 1;
                if *n == 0 {
                    *self = FailureMode::Never;
                }
                true
            }
        }
    }
}

/// Repository holding issues in memory
pub struct InMemoryRepository {
    issues: RefCell<Vec<Issue>>,
    clock: Rc<dyn Clock>,
    latency: Duration,
    fetch_failures: Cell<FailureMode>,
    update_failures: Cell<FailureMode>,
    update_calls: Cell<usize>,
}

impl InMemoryRepository {
    /// Create a repository seeded with `issues` and the default latency.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues: RefCell::new(issues),
            clock: Rc::new(SystemClock),
            latency: DEFAULT_LATENCY,
            fetch_failures: Cell::new(FailureMode::Never),
            update_failures: Cell::new(FailureMode::Never),
            update_calls: Cell::new(0),
        }
    }

    /// Create a repository from a JSON array of issues.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidSeed` if the document does not parse.
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        let issues: Vec<Issue> = serde_json::from_str(json)?;
        debug!("Seeded repository with {} issues", issues.len());
        Ok(Self::new(issues))
    }

    /// Set the simulated round-trip time
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Use `clock` for server-side `updated_at` stamps
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Control failures of `fetch_all` and `fetch_by_id`
    pub fn fail_fetches(&self, mode: FailureMode) {
        self.fetch_failures.set(mode);
    }

    /// Control failures of `update`
    pub fn fail_updates(&self, mode: FailureMode) {
        self.update_failures.set(mode);
    }

    /// Number of `update` calls received so far, failed ones included
    pub fn update_calls(&self) -> usize {
        self.update_calls.get()
    }

    /// Current stored copy of an issue
    pub fn stored(&self, id: &str) -> Option<Issue> {
        self.issues.borrow().iter().find(|i| i.id == id).cloned()
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn trip(cell: &Cell<FailureMode>) -> bool {
        let mut mode = cell.get();
        let failed = mode.trip();
        cell.set(mode);
        failed
    }
}

#[async_trait(?Send)]
impl IssueRepository for InMemoryRepository {
    async fn fetch_all(&self) -> RepositoryResult<Vec<Issue>> {
        self.round_trip().await;
        if Self::trip(&self.fetch_failures) {
            warn!("Simulated failure fetching issues");
            return Err(RepositoryError::Transient {
                message: "Failed to fetch issues".to_string(),
            });
        }
        let issues = self.issues.borrow().clone();
        trace!("Fetched {} issues", issues.len());
        Ok(issues)
    }

    async fn fetch_by_id(&self, id: &str) -> RepositoryResult<Option<Issue>> {
        self.round_trip().await;
        if Self::trip(&self.fetch_failures) {
            warn!("Simulated failure fetching issue: {}", id);
            return Err(RepositoryError::Transient {
                message: format!("Failed to fetch issue {}", id),
            });
        }
        Ok(self.stored(id))
    }

    async fn update(&self, id: &str, update: &IssueUpdate) -> RepositoryResult<Issue> {
        self.update_calls.set(self.update_calls.get() + 1);
        self.round_trip().await;
        if Self::trip(&self.update_failures) {
            warn!("Simulated failure updating issue: {}", id);
            return Err(RepositoryError::Transient {
                message: "Network error".to_string(),
            });
        }

        let mut issues = self.issues.borrow_mut();
        let issue = issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                issue_id: id.to_string(),
            })?;
        update.apply_to(issue);
        issue.updated_at = self.clock.now();
        debug!("Stored update for issue: {}", id);
        Ok(issue.clone())
    }
}
