//! Data models for the kanban board
//!
//! Defines the issue record as the repository serves it, the closed status
//! and role enums, and their display labels.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue status
///
/// One board column per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueStatus {
    Backlog,
    InProgress,
    Done,
}

impl IssueStatus {
    /// All statuses in board column order
    pub const ALL: [IssueStatus; 3] = [
        IssueStatus::Backlog,
        IssueStatus::InProgress,
        IssueStatus::Done,
    ];

    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Backlog => "backlog",
            IssueStatus::InProgress => "inProgress",
            IssueStatus::Done => "done",
        }
    }

    /// Returns the human-readable column title
    pub fn label(&self) -> &'static str {
        match self {
            IssueStatus::Backlog => "Backlog",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Done => "Done",
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    /// Accepts the wire form as well as `in_progress` / `in-progress`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backlog" => Ok(IssueStatus::Backlog),
            "inprogress" | "in_progress" | "in-progress" => Ok(IssueStatus::InProgress),
            "done" => Ok(IssueStatus::Done),
            _ => Err(format!(
                "invalid status '{}'. Valid values: backlog, in-progress, done",
                s
            )),
        }
    }
}

/// Role of the acting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Contributor,
}

impl UserRole {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Contributor => "contributor",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "contributor" => Ok(UserRole::Contributor),
            _ => Err(format!(
                "invalid role '{}'. Valid values: admin, contributor",
                s
            )),
        }
    }
}

/// The user acting on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: UserRole,
}

impl User {
    /// Create a user with the given name and role
    pub fn new(name: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Severity labels, most severe first
pub const SEVERITY_LABELS: [(i32, &str); 5] = [
    (5, "Critical"),
    (4, "High"),
    (3, "Moderate"),
    (2, "Low"),
    (1, "Minor"),
];

/// Label for a severity value; anything outside 1-5 is "Unknown".
pub fn severity_label(severity: i32) -> &'static str {
    SEVERITY_LABELS
        .iter()
        .find(|(value, _)| *value == severity)
        .map_or("Unknown", |(_, label)| *label)
}

/// A trackable unit of work on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Opaque identifier, e.g. `ISSUE-001`
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub status: IssueStatus,

    /// Display order is preserved; matching ignores it
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub assignee: String,

    /// Expected in 1-5 but not enforced
    pub severity: i32,

    #[serde(default)]
    pub user_defined_rank: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Create a backlog issue created (and last updated) at `created_at`
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: IssueStatus::Backlog,
            tags: Vec::new(),
            assignee: String::new(),
            severity: 1,
            user_defined_rank: 0,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    pub fn with_severity(mut self, severity: i32) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.user_defined_rank = rank;
        self
    }

    /// Severity label for display
    pub fn severity_label(&self) -> &'static str {
        severity_label(self.severity)
    }
}
