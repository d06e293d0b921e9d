//! Single-issue detail view and the "mark as resolved" action

use tracing::{debug, info, warn};

use crate::engine::IssueEngine;
use crate::error::{EngineError, ResolveError, TransitionError};
use crate::models::{Issue, IssueStatus, User};
use crate::notification::{NotificationChannel, NotificationKind};
use crate::permissions::can_resolve_issues;
use crate::priority::calculate_priority_at;
use crate::repository::IssueUpdate;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load issue";
pub const RESOLVED_MESSAGE: &str = "Issue marked as resolved";
pub const RESOLVE_FAILED_MESSAGE: &str = "Failed to mark issue as resolved";

/// Everything the detail page shows about one issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetail {
    pub issue: Issue,
    pub priority: i64,
    pub severity_label: &'static str,
    pub status_label: &'static str,
    /// Whether the resolve action should be offered
    pub can_resolve: bool,
}

impl IssueDetail {
    pub fn new(issue: Issue, user: &User, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            priority: calculate_priority_at(&issue, now),
            severity_label: issue.severity_label(),
            status_label: issue.status.label(),
            can_resolve: can_resolve_issues(user) && issue.status != IssueStatus::Done,
            issue,
        }
    }
}

/// Result of the resolve action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(Issue),
    /// Already in Done; nothing was sent
    AlreadyDone,
}

/// Load one issue straight from the repository.
///
/// `Ok(None)` means the repository does not know the id.
///
/// # Errors
///
/// Returns `EngineError::FetchFailure` after raising an error notification.
pub async fn load_detail(
    engine: &IssueEngine,
    notifications: &NotificationChannel,
    user: &User,
    id: &str,
) -> Result<Option<IssueDetail>, EngineError> {
    match engine.fetch_issue(id).await {
        Ok(Some(issue)) => Ok(Some(IssueDetail::new(issue, user, engine.now()))),
        Ok(None) => {
            debug!("Issue not found: {}", id);
            Ok(None)
        }
        Err(err) => {
            notifications.notify(LOAD_FAILED_MESSAGE, NotificationKind::Error, None);
            Err(err)
        }
    }
}

/// Move an issue to Done and persist it.
///
/// # Errors
///
/// Returns `ResolveError::Rejected` if the user may not resolve issues or
/// the issue is not loaded, and `ResolveError::Engine` if the persist fails.
pub async fn resolve_issue(
    engine: &IssueEngine,
    notifications: &NotificationChannel,
    user: &User,
    id: &str,
) -> Result<ResolveOutcome, ResolveError> {
    if !can_resolve_issues(user) {
        return Err(TransitionError::PermissionDenied {
            role: user.role,
            action: "resolve issues",
        }
        .into());
    }

    let current = engine.issue(id).ok_or_else(|| TransitionError::UnknownIssue {
        issue_id: id.to_string(),
    })?;
    if current.status == IssueStatus::Done {
        debug!("Issue {} already resolved", id);
        return Ok(ResolveOutcome::AlreadyDone);
    }

    match engine
        .persist_update(id, &IssueUpdate::status(IssueStatus::Done))
        .await
    {
        Ok(issue) => {
            info!("Resolved issue {}", id);
            notifications.notify(RESOLVED_MESSAGE, NotificationKind::Success, None);
            Ok(ResolveOutcome::Resolved(issue))
        }
        Err(err) => {
            warn!("Failed to resolve issue {}: {}", id, err);
            notifications.notify(RESOLVE_FAILED_MESSAGE, NotificationKind::Error, None);
            Err(err.into())
        }
    }
}
