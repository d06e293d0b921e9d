use std::path::PathBuf;

use kanban_core::{EngineError, RepositoryError, ResolveError, TransitionError};
use thiserror::Error;

/// Errors surfaced by the kanban CLI
#[derive(Error, Debug)]
pub enum CliError {
    /// The issue data file could not be read
    #[error("Failed to read issue data from {path}: {source}")]
    ReadData {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A flag or environment variable holds an unusable value
    #[error("Invalid {name} '{value}': {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Issue '{issue_id}' not found")]
    IssueNotFound { issue_id: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Rejected(e) => CliError::Transition(e),
            ResolveError::Engine(e) => CliError::Engine(e),
        }
    }
}

impl CliError {
    /// Get the full error message including engine error details.
    ///
    /// This is what `main` prints after `error: `.
    pub fn full_message(&self) -> String {
        match self {
            CliError::Engine(e) => e.full_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
