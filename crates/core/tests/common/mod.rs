//! Test infrastructure for integration tests
//!
//! Builds an isolated board (repository, engine, notifications and a drag
//! controller) per test so no state is shared.

use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use kanban_core::{
    DragController, InMemoryRepository, Issue, IssueEngine, IssueStatus, ManualClock,
    NotificationChannel, NotificationKind, User, UserRole,
};

/// Fixed "now" for every test board
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
}

/// Issue created `days_ago` days before [`now`]
pub fn issue(id: &str, title: &str, days_ago: i64) -> Issue {
    Issue::new(id, title, now() - ChronoDuration::days(days_ago))
}

pub fn seed() -> Vec<Issue> {
    vec![
        issue("ISSUE-001", "Login page broken", 3)
            .with_tags(["auth", "Bug"])
            .with_assignee("alice")
            .with_severity(5)
            .with_rank(10),
        issue("ISSUE-002", "Add dark mode", 12)
            .with_tags(["ui"])
            .with_assignee("bob")
            .with_severity(2)
            .with_status(IssueStatus::InProgress),
        issue("ISSUE-003", "Export to CSV", 30)
            .with_assignee("carol")
            .with_severity(3)
            .with_status(IssueStatus::Done),
        issue("ISSUE-004", "Crash on empty search", 1)
            .with_tags(["search"])
            .with_assignee("alice")
            .with_severity(4),
    ]
}

/// Test context holding one isolated board
pub struct BoardContext {
    pub repo: Rc<InMemoryRepository>,
    pub engine: Rc<IssueEngine>,
    pub notifications: Rc<NotificationChannel>,
    #[allow(dead_code)]
    pub clock: Rc<ManualClock>,
}

impl BoardContext {
    /// Hydrated board with no simulated latency.
    pub async fn new() -> Self {
        Self::with_latency(Duration::ZERO).await
    }

    /// Hydrated board whose repository answers after `latency`.
    ///
    /// Tests using a non-zero latency should run with paused time.
    pub async fn with_latency(latency: Duration) -> Self {
        let clock = Rc::new(ManualClock::new(now()));
        let repo = Rc::new(
            InMemoryRepository::new(seed())
                .with_latency(latency)
                .with_clock(clock.clone()),
        );
        let engine = Rc::new(IssueEngine::new(repo.clone()).with_clock(clock.clone()));
        engine.hydrate().await.unwrap();

        Self {
            repo,
            engine,
            notifications: Rc::new(NotificationChannel::new()),
            clock,
        }
    }

    pub fn controller(&self, role: UserRole) -> DragController {
        DragController::new(
            self.engine.clone(),
            self.notifications.clone(),
            User::new("Alice", role),
        )
    }

    pub fn status_of(&self, id: &str) -> Option<IssueStatus> {
        self.engine.issue(id).map(|i| i.status)
    }

    /// Messages of every notification of `kind` raised so far
    pub fn messages(&self, kind: NotificationKind) -> Vec<String> {
        self.notifications
            .history()
            .into_iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message)
            .collect()
    }

    pub fn view_ids(&self) -> Vec<String> {
        self.engine
            .filtered_issues()
            .into_iter()
            .map(|i| i.id)
            .collect()
    }
}
