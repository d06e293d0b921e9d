use thiserror::Error;

use crate::models::UserRole;

/// Errors reported by an issue repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The repository does not know the requested issue
    #[error("Issue {issue_id} not found")]
    NotFound { issue_id: String },

    /// Network or server failure; the call may succeed if repeated
    #[error("{message}")]
    Transient { message: String },

    /// Seed data could not be parsed
    #[error("Invalid issue data: {message}")]
    InvalidSeed { message: String },
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InvalidSeed {
            message: err.to_string(),
        }
    }
}

/// Errors reported by the issue state engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Hydration failed; the issue set was left untouched
    #[error("Failed to fetch issues")]
    FetchFailure {
        #[source]
        source: RepositoryError,
    },

    /// Persist referenced an id the repository does not recognize
    #[error("Issue '{issue_id}' not found")]
    UpdateNotFound { issue_id: String },

    /// Persist failed on the way to or inside the repository
    #[error("Failed to update issue '{issue_id}': {message}")]
    UpdateTransientFailure { issue_id: String, message: String },

    /// A local mutation named an issue that is not in the issue set
    #[error("Issue '{issue_id}' is not loaded")]
    UnknownIssue { issue_id: String },
}

impl EngineError {
    /// Classify a repository error raised by an update call.
    pub fn from_update(issue_id: &str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { issue_id } => EngineError::UpdateNotFound { issue_id },
            RepositoryError::Transient { message } | RepositoryError::InvalidSeed { message } => {
                EngineError::UpdateTransientFailure {
                    issue_id: issue_id.to_string(),
                    message,
                }
            }
        }
    }

    /// Get the full error message including the repository error details.
    ///
    /// This is what gets surfaced to the user.
    pub fn full_message(&self) -> String {
        match self {
            EngineError::FetchFailure { source } => format!("Failed to fetch issues: {}", source),
            other => other.to_string(),
        }
    }
}

/// Reasons a drag gesture or issue action is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The acting user lacks the capability for this action
    #[error("Role '{role}' is not allowed to {action}")]
    PermissionDenied { role: UserRole, action: &'static str },

    /// The gesture started on an issue the engine does not hold
    #[error("Issue '{issue_id}' is not on the board")]
    UnknownIssue { issue_id: String },

    /// A gesture end arrived with no gesture in progress
    #[error("No drag in progress")]
    NotDragging,
}

/// Errors from the "mark as resolved" action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type alias for repository calls
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
