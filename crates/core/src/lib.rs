//! Client-side state engine for a kanban issue board
//!
//! Holds the canonical issue set, derives a filtered and priority-sorted
//! board view, applies status changes optimistically with rollback on
//! persist failure, and gates actions by user role.
//!
//! Everything here runs on a single cooperative thread: share the engine,
//! notification channel and drag controller through `Rc` and drive them from
//! a current-thread tokio runtime.

pub mod clock;
pub mod detail;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod notification;
pub mod permissions;
pub mod priority;
pub mod repository;
pub mod transition;

pub use clock::{Clock, ManualClock, SystemClock};
pub use detail::{IssueDetail, ResolveOutcome, load_detail, resolve_issue};
pub use engine::{
    BoardColumns, DEFAULT_SYNC_INTERVAL, IssueEngine, PersistOutcome, TransitionToken,
};
pub use error::{
    EngineError, EngineResult, RepositoryError, RepositoryResult, ResolveError, TransitionError,
};
pub use filter::{FilterOptions, FilterPatch};
pub use models::{Issue, IssueStatus, User, UserRole, severity_label};
pub use notification::{
    Notification, NotificationChannel, NotificationId, NotificationKind, UndoToken,
};
pub use permissions::{Capabilities, capabilities, capabilities_for};
pub use priority::{calculate_priority, calculate_priority_at, sort_issues_by_priority};
pub use repository::{
    DEFAULT_LATENCY, FailureMode, InMemoryRepository, IssueRepository, IssueUpdate,
};
pub use transition::{DragController, DragPhase, DropOutcome, UndoOutcome};
