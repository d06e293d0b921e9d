//! Partial issue updates

use crate::models::{Issue, IssueStatus};

/// Update structure for partial issue updates
///
/// Only `Some` fields are applied. Identity and timestamps are never part of
/// an update; whoever applies it stamps `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    /// New title (if Some)
    pub title: Option<String>,
    /// New description (if Some)
    pub description: Option<String>,
    /// New status (if Some)
    pub status: Option<IssueStatus>,
    /// Replacement tag list (if Some)
    pub tags: Option<Vec<String>>,
    /// New assignee (if Some)
    pub assignee: Option<String>,
    /// New severity (if Some)
    pub severity: Option<i32>,
    /// New user-defined rank (if Some)
    pub user_defined_rank: Option<i32>,
}

impl IssueUpdate {
    /// Create a new empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a status-only update
    pub fn status(status: IssueStatus) -> Self {
        Self::new().with_status(status)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.into()).collect());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_severity(mut self, severity: i32) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.user_defined_rank = Some(rank);
        self
    }

    /// Check if any updates are specified
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.status.is_some()
            || self.tags.is_some()
            || self.assignee.is_some()
            || self.severity.is_some()
            || self.user_defined_rank.is_some()
    }

    /// Merge the specified fields into `issue`. Leaves `updated_at` alone.
    pub fn apply_to(&self, issue: &mut Issue) {
        if let Some(title) = &self.title {
            issue.title = title.clone();
        }
        if let Some(description) = &self.description {
            issue.description = description.clone();
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(tags) = &self.tags {
            issue.tags = tags.clone();
        }
        if let Some(assignee) = &self.assignee {
            issue.assignee = assignee.clone();
        }
        if let Some(severity) = self.severity {
            issue.severity = severity;
        }
        if let Some(rank) = self.user_defined_rank {
            issue.user_defined_rank = rank;
        }
    }
}
