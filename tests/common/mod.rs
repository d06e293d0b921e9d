//! Test infrastructure for CLI integration tests
//!
//! Each test writes its own issue file to a unique temp path and builds a
//! board from it, so no state is shared.

use std::path::PathBuf;
use std::time::Duration;

use kanban::BoardContext;
use kanban::config::{DataSource, Settings};
use kanban_core::{User, UserRole};

const ISSUES: &str = r#"[
  {"id": "WEB-1", "title": "Broken signup form", "status": "backlog", "tags": ["bug"],
   "assignee": "erin", "severity": 5, "userDefinedRank": 0,
   "createdAt": "2024-06-01T00:00:00Z", "updatedAt": "2024-06-01T00:00:00Z"},
  {"id": "WEB-2", "title": "Footer links", "status": "inProgress", "tags": [],
   "assignee": "frank", "severity": 1, "userDefinedRank": 0,
   "createdAt": "2024-06-01T00:00:00Z", "updatedAt": "2024-06-01T00:00:00Z"},
  {"id": "WEB-3", "title": "Pricing page copy", "status": "done",
   "severity": 2, "createdAt": "2024-05-01T00:00:00Z", "updatedAt": "2024-05-03T00:00:00Z"}
]"#;

/// Test context owning a temp issue file
pub struct TestContext {
    pub path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "kanban-integration-{}-{:?}-{}.json",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, ISSUES).unwrap();
        Self { path }
    }

    pub fn settings(&self, role: UserRole, fail_updates: bool) -> Settings {
        Settings {
            data: DataSource::File(self.path.clone()),
            user: User::new("Erin", role),
            latency: Duration::ZERO,
            fail_updates,
        }
    }

    pub fn board(&self, role: UserRole) -> BoardContext {
        BoardContext::open(&self.settings(role, false)).unwrap()
    }

    pub fn failing_board(&self) -> BoardContext {
        BoardContext::open(&self.settings(UserRole::Admin, true)).unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
