//! Issue state engine
//!
//! Owns the canonical issue set, the active filters and the derived board
//! view. The view is rebuilt synchronously after every mutation, so it is
//! never stale relative to the last completed command.
//!
//! Every local mutation of an issue bumps that issue's revision. Optimistic
//! updates hand out a [`TransitionToken`] capturing the revision they
//! produced; guarded persists and reverts only apply while the token is
//! still current, so a completion that lost a race becomes a no-op.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{EngineError, EngineResult};
use crate::filter::{FilterOptions, FilterPatch};
use crate::models::{Issue, IssueStatus};
use crate::priority::rank_by_priority;
use crate::repository::{IssueRepository, IssueUpdate};

/// Default interval between background re-hydrations
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10);

/// Proof of a specific local mutation of one issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionToken {
    issue_id: String,
    revision: u64,
}

impl TransitionToken {
    pub fn issue_id(&self) -> &str {
        &self.issue_id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Result of a guarded persist that reached the repository successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The server copy replaced the local issue
    Applied(Issue),
    /// The issue was mutated again locally; the server copy was dropped
    Stale(Issue),
}

/// The filtered view split into board columns, each in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    pub backlog: Vec<Issue>,
    pub in_progress: Vec<Issue>,
    pub done: Vec<Issue>,
}

impl BoardColumns {
    fn from_view(view: &[Issue]) -> Self {
        let mut columns = Self::default();
        for issue in view {
            columns.column_mut(issue.status).push(issue.clone());
        }
        columns
    }

    fn column_mut(&mut self, status: IssueStatus) -> &mut Vec<Issue> {
        match status {
            IssueStatus::Backlog => &mut self.backlog,
            IssueStatus::InProgress => &mut self.in_progress,
            IssueStatus::Done => &mut self.done,
        }
    }

    /// Issues in the column for `status`
    pub fn column(&self, status: IssueStatus) -> &[Issue] {
        match status {
            IssueStatus::Backlog => &self.backlog,
            IssueStatus::InProgress => &self.in_progress,
            IssueStatus::Done => &self.done,
        }
    }

    /// Columns in board order
    pub fn iter(&self) -> impl Iterator<Item = (IssueStatus, &[Issue])> {
        IssueStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    pub fn len(&self) -> usize {
        self.backlog.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct EngineState {
    /// Canonical issue set, in repository order
    issues: Vec<Issue>,
    filters: FilterOptions,
    /// Filter-then-sort projection of `issues`
    filtered: Vec<Issue>,
    revisions: HashMap<String, u64>,
    last_revision: u64,
    is_loading: bool,
    error: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
}

impl EngineState {
    fn recompute(&mut self, now: DateTime<Utc>) {
        let matching = self.filters.apply(&self.issues);
        self.filtered = rank_by_priority(matching, now).into_iter().cloned().collect();
        trace!(
            "Recomputed view: {} of {} issues",
            self.filtered.len(),
            self.issues.len()
        );
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Issue> {
        self.issues.iter_mut().find(|issue| issue.id == id)
    }

    /// Keyed replace; returns false when the id is not in the set.
    fn replace(&mut self, issue: Issue) -> bool {
        match self.find_mut(&issue.id) {
            Some(slot) => {
                *slot = issue;
                true
            }
            None => false,
        }
    }

    fn bump(&mut self, id: &str) -> u64 {
        self.last_revision += 1;
        self.revisions.insert(id.to_string(), self.last_revision);
        self.last_revision
    }

    fn is_current(&self, token: &TransitionToken) -> bool {
        self.revisions.get(&token.issue_id) == Some(&token.revision)
    }
}

/// Client-side owner of the issue set
///
/// Share it with collaborators through an `Rc`; reads return copies and
/// writes go through the command methods only.
pub struct IssueEngine {
    repository: Rc<dyn IssueRepository>,
    clock: Rc<dyn Clock>,
    state: RefCell<EngineState>,
}

impl IssueEngine {
    /// Create an empty engine backed by `repository`.
    pub fn new(repository: Rc<dyn IssueRepository>) -> Self {
        Self {
            repository,
            clock: Rc::new(SystemClock),
            state: RefCell::new(EngineState::default()),
        }
    }

    /// Use `clock` for `updated_at` stamps and priority ranking
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the engine's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Every issue, in repository order
    pub fn issues(&self) -> Vec<Issue> {
        self.state.borrow().issues.clone()
    }

    /// The filtered view in priority order
    pub fn filtered_issues(&self) -> Vec<Issue> {
        self.state.borrow().filtered.clone()
    }

    /// One issue from the issue set
    pub fn issue(&self, id: &str) -> Option<Issue> {
        self.state
            .borrow()
            .issues
            .iter()
            .find(|issue| issue.id == id)
            .cloned()
    }

    pub fn filters(&self) -> FilterOptions {
        self.state.borrow().filters.clone()
    }

    /// The filtered view grouped by status
    pub fn columns(&self) -> BoardColumns {
        BoardColumns::from_view(&self.state.borrow().filtered)
    }

    /// Distinct non-empty assignees across the whole issue set, sorted
    pub fn assignees(&self) -> Vec<String> {
        self.state
            .borrow()
            .issues
            .iter()
            .filter(|issue| !issue.assignee.is_empty())
            .map(|issue| issue.assignee.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Last surfaced error message, if any
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_synced_at
    }

    /// Whether `token` still names the latest local mutation of its issue
    pub fn is_current(&self, token: &TransitionToken) -> bool {
        self.state.borrow().is_current(token)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Replace the issue set with the repository's contents.
    ///
    /// On failure the existing set is left untouched and the error is
    /// recorded for display.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FetchFailure` if the repository call fails.
    pub async fn hydrate(&self) -> EngineResult<usize> {
        {
            let mut state = self.state.borrow_mut();
            state.is_loading = true;
            state.error = None;
        }
        debug!("Hydrating issue set");

        let result = self.repository.fetch_all().await;

        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        state.is_loading = false;
        match result {
            Ok(issues) => {
                let count = issues.len();
                state.issues = issues;
                state.last_synced_at = Some(now);
                state.recompute(now);
                info!("Hydrated {} issues", count);
                Ok(count)
            }
            Err(source) => {
                let err = EngineError::FetchFailure { source };
                warn!("{}", err.full_message());
                state.error = Some(err.full_message());
                Err(err)
            }
        }
    }

    /// Merge `patch` into the active filters and rebuild the view.
    pub fn set_filters(&self, patch: FilterPatch) {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        state.filters.merge(patch);
        trace!("Filters now: {:?}", state.filters);
        state.recompute(now);
    }

    /// Apply `update` to one issue in memory and rebuild the view.
    ///
    /// Stamps `updated_at` with the current time. Never touches the
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownIssue` if `id` is not in the issue set.
    pub fn update_optimistic(&self, id: &str, update: &IssueUpdate) -> EngineResult<TransitionToken> {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        let issue = state.find_mut(id).ok_or_else(|| EngineError::UnknownIssue {
            issue_id: id.to_string(),
        })?;
        update.apply_to(issue);
        issue.updated_at = now;

        let revision = state.bump(id);
        state.recompute(now);
        debug!("Optimistic update of issue {} (revision {})", id, revision);

        Ok(TransitionToken {
            issue_id: id.to_string(),
            revision,
        })
    }

    /// Send `update` to the repository and adopt the server copy.
    ///
    /// Failures are recorded and returned; the engine does not revert on its
    /// own.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UpdateNotFound` or
    /// `EngineError::UpdateTransientFailure` if the repository rejects it.
    pub async fn persist_update(&self, id: &str, update: &IssueUpdate) -> EngineResult<Issue> {
        let canonical = self.send_update(id, update).await?;

        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        if state.replace(canonical.clone()) {
            state.bump(id);
            state.recompute(now);
        } else {
            debug!("Persisted issue {} is no longer in the issue set", id);
        }
        Ok(canonical)
    }

    /// Persist the change made under `token`.
    ///
    /// The server copy is adopted only if no newer local mutation of the
    /// issue happened while the call was in flight.
    ///
    /// # Errors
    ///
    /// Same as [`IssueEngine::persist_update`].
    pub async fn persist_transition(
        &self,
        token: &TransitionToken,
        update: &IssueUpdate,
    ) -> EngineResult<PersistOutcome> {
        let canonical = self.send_update(&token.issue_id, update).await?;

        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        if !state.is_current(token) {
            debug!(
                "Dropping stale persist of issue {} (revision {})",
                token.issue_id, token.revision
            );
            return Ok(PersistOutcome::Stale(canonical));
        }
        state.replace(canonical.clone());
        state.recompute(now);
        Ok(PersistOutcome::Applied(canonical))
    }

    /// Restore one issue to `snapshot` verbatim, `updated_at` included.
    ///
    /// Returns false if the issue is no longer in the set.
    pub fn revert(&self, snapshot: Issue) -> bool {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        let id = snapshot.id.clone();
        if !state.replace(snapshot) {
            debug!("Cannot revert issue {}: not in the issue set", id);
            return false;
        }
        state.bump(&id);
        state.recompute(now);
        debug!("Reverted issue {}", id);
        true
    }

    /// Revert only if `token` is still the latest mutation of its issue.
    pub fn revert_transition(&self, token: &TransitionToken, snapshot: Issue) -> bool {
        if !self.is_current(token) {
            debug!(
                "Skipping revert of issue {}: revision {} superseded",
                token.issue_id, token.revision
            );
            return false;
        }
        self.revert(snapshot)
    }

    /// Look one issue up in the repository without touching the issue set.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FetchFailure` if the repository call fails.
    pub async fn fetch_issue(&self, id: &str) -> EngineResult<Option<Issue>> {
        debug!("Fetching issue: {}", id);
        self.repository.fetch_by_id(id).await.map_err(|source| {
            warn!("Failed to fetch issue {}: {}", id, source);
            EngineError::FetchFailure { source }
        })
    }

    /// Hydrate now and then every `interval`.
    ///
    /// A failed tick is recorded like any hydrate failure and polling
    /// continues. Runs forever unless `ticks` bounds it; `on_tick` sees each
    /// result after it has been applied.
    pub async fn sync_every<F>(&self, interval: Duration, ticks: Option<usize>, mut on_tick: F)
    where
        F: FnMut(&Self, &EngineResult<usize>),
    {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut done = 0usize;

        while ticks.is_none_or(|limit| done < limit) {
            timer.tick().await;
            let result = self.hydrate().await;
            on_tick(self, &result);
            done += 1;
        }
    }

    async fn send_update(&self, id: &str, update: &IssueUpdate) -> EngineResult<Issue> {
        debug!("Persisting update of issue {}", id);
        match self.repository.update(id, update).await {
            Ok(issue) => Ok(issue),
            Err(source) => {
                let err = EngineError::from_update(id, source);
                warn!("{}", err);
                self.state.borrow_mut().error = Some(err.full_message());
                Err(err)
            }
        }
    }
}

// The engine is shared by Rc on one cooperative thread
static_assertions::assert_not_impl_any!(IssueEngine: Send, Sync);
static_assertions::assert_impl_all!(Issue: Send, Sync);
