//! Wiring of repository, engine and notifications for one CLI run

use std::rc::Rc;

use kanban_core::{
    DragController, FailureMode, InMemoryRepository, IssueEngine, NotificationChannel, User,
};
use tracing::debug;

use crate::config::{DataSource, EMBEDDED_ISSUES, Settings};
use crate::error::{CliError, CliResult};

/// Everything a command needs to act on the board
pub struct BoardContext {
    pub repo: Rc<InMemoryRepository>,
    pub engine: Rc<IssueEngine>,
    pub notifications: Rc<NotificationChannel>,
    pub user: User,
}

impl BoardContext {
    /// Build a board from resolved settings. Does not hydrate.
    ///
    /// # Errors
    ///
    /// Returns `CliError::ReadData` if the data file cannot be read and
    /// `CliError::Repository` if it does not hold a JSON issue list.
    pub fn open(settings: &Settings) -> CliResult<Self> {
        let json = match &settings.data {
            DataSource::Embedded => EMBEDDED_ISSUES.to_string(),
            DataSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| CliError::ReadData {
                    path: path.clone(),
                    source,
                })?
            }
        };
        debug!("Loading issues from {:?}", settings.data);

        let repo = InMemoryRepository::from_json(&json)?.with_latency(settings.latency);
        if settings.fail_updates {
            repo.fail_updates(FailureMode::Always);
        }
        Ok(Self::from_repository(Rc::new(repo), settings.user.clone()))
    }

    pub fn from_repository(repo: Rc<InMemoryRepository>, user: User) -> Self {
        let engine = Rc::new(IssueEngine::new(repo.clone()));
        Self {
            repo,
            engine,
            notifications: Rc::new(NotificationChannel::new()),
            user,
        }
    }

    /// Drag controller acting as this run's user
    pub fn controller(&self) -> DragController {
        DragController::new(
            self.engine.clone(),
            self.notifications.clone(),
            self.user.clone(),
        )
    }
}
