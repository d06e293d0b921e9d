//! Drag-and-drop status transitions
//!
//! A gesture moves through `Idle -> Dragging -> (Idle | Committing)`. A drop
//! on a new column applies the change optimistically, raises an undoable
//! notification and then persists. A failed persist reverts to the snapshot
//! captured when the gesture started.
//!
//! Reverts and persist completions are guarded by the engine's transition
//! tokens, so an undo that lands while the persist is still in flight wins
//! and the late completion does nothing.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::engine::{IssueEngine, PersistOutcome, TransitionToken};
use crate::error::{EngineError, TransitionError};
use crate::models::{Issue, IssueStatus, User};
use crate::notification::{NotificationChannel, NotificationId, NotificationKind, UndoToken};
use crate::permissions::can_move_issues;
use crate::repository::IssueUpdate;

/// Shown when a persist fails and the move is rolled back
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update issue. Change reverted.";

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Committing,
}

/// How a gesture end was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped outside any column or on the starting column
    Cancelled,
    /// The move was persisted and the server copy adopted
    Persisted(Issue),
    /// The move was undone or moved again before its persist completed
    Superseded,
    /// The persist failed and the move was rolled back
    Reverted(EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    /// Expired, already used, or unknown
    Unavailable,
    /// The issue changed again since the move; nothing was restored
    Superseded,
}

/// Captured at gesture start
#[derive(Debug, Clone)]
struct PendingTransition {
    snapshot: Issue,
}

#[derive(Debug)]
enum DragState {
    Idle,
    Dragging(PendingTransition),
    Committing { gesture: u64 },
}

#[derive(Debug, Clone)]
struct UndoEntry {
    snapshot: Issue,
    token: TransitionToken,
    notification: NotificationId,
}

/// Turns drag gestures into engine updates for one acting user
pub struct DragController {
    engine: Rc<IssueEngine>,
    notifications: Rc<NotificationChannel>,
    user: User,
    state: RefCell<DragState>,
    gestures: Cell<u64>,
    undo_entries: RefCell<HashMap<UndoToken, UndoEntry>>,
    next_undo: Cell<u64>,
}

impl DragController {
    pub fn new(engine: Rc<IssueEngine>, notifications: Rc<NotificationChannel>, user: User) -> Self {
        Self {
            engine,
            notifications,
            user,
            state: RefCell::new(DragState::Idle),
            gestures: Cell::new(0),
            undo_entries: RefCell::new(HashMap::new()),
            next_undo: Cell::new(1),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn phase(&self) -> DragPhase {
        match &*self.state.borrow() {
            DragState::Idle => DragPhase::Idle,
            DragState::Dragging(_) => DragPhase::Dragging,
            DragState::Committing { .. } => DragPhase::Committing,
        }
    }

    /// Start dragging `issue_id`.
    ///
    /// Replaces any gesture that has not been dropped yet.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::PermissionDenied` if the user may not move
    /// issues, or `TransitionError::UnknownIssue` if the engine does not
    /// hold the issue. Nothing is captured in either case.
    pub fn begin_drag(&self, issue_id: &str) -> Result<(), TransitionError> {
        if !can_move_issues(&self.user) {
            debug!("Drag of {} rejected for role {}", issue_id, self.user.role);
            return Err(TransitionError::PermissionDenied {
                role: self.user.role,
                action: "move issues",
            });
        }

        let snapshot = self
            .engine
            .issue(issue_id)
            .ok_or_else(|| TransitionError::UnknownIssue {
                issue_id: issue_id.to_string(),
            })?;

        debug!("Dragging {} from {}", issue_id, snapshot.status);
        *self.state.borrow_mut() = DragState::Dragging(PendingTransition { snapshot });
        Ok(())
    }

    /// Finish the current gesture over `target`, or outside any column.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NotDragging` if no gesture is in progress.
    pub async fn end_drag(&self, target: Option<IssueStatus>) -> Result<DropOutcome, TransitionError> {
        self.prune_undo_entries();

        let pending = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, DragState::Idle) {
                DragState::Dragging(pending) => pending,
                other => {
                    *state = other;
                    return Err(TransitionError::NotDragging);
                }
            }
        };

        let snapshot = pending.snapshot;
        let Some(to) = target.filter(|to| *to != snapshot.status) else {
            debug!("Drag of {} cancelled", snapshot.id);
            return Ok(DropOutcome::Cancelled);
        };

        let update = IssueUpdate::status(to);
        let token = match self.engine.update_optimistic(&snapshot.id, &update) {
            Ok(token) => token,
            // Removed by a hydrate between gesture start and drop
            Err(EngineError::UnknownIssue { issue_id }) => {
                return Err(TransitionError::UnknownIssue { issue_id });
            }
            Err(err) => return Ok(DropOutcome::Reverted(err)),
        };

        let undo = self.register_undo(&snapshot, &token, to);
        let gesture = self.gestures.get() + 1;
        self.gestures.set(gesture);
        *self.state.borrow_mut() = DragState::Committing { gesture };

        let outcome = match self.engine.persist_transition(&token, &update).await {
            Ok(PersistOutcome::Applied(issue)) => {
                info!("Moved {} to {}", issue.id, issue.status);
                DropOutcome::Persisted(issue)
            }
            Ok(PersistOutcome::Stale(_)) => DropOutcome::Superseded,
            Err(err) => self.roll_back(snapshot, &token, undo, err),
        };

        self.finish_commit(gesture);
        Ok(outcome)
    }

    /// Undo the move announced by notification `id`.
    ///
    /// Local only: the repository is not told about the restored status.
    pub fn undo(&self, id: NotificationId) -> UndoOutcome {
        self.prune_undo_entries();

        let Some(undo) = self.notifications.take_undo(id) else {
            return UndoOutcome::Unavailable;
        };
        let Some(entry) = self.undo_entries.borrow_mut().remove(&undo) else {
            return UndoOutcome::Unavailable;
        };

        if !self.engine.revert_transition(&entry.token, entry.snapshot.clone()) {
            debug!("Undo of {} superseded by a later change", entry.snapshot.id);
            return UndoOutcome::Superseded;
        }

        let snapshot = entry.snapshot;
        self.notifications.notify(
            format!(
                "{}: {} restored to {}",
                snapshot.id,
                snapshot.title,
                snapshot.status.label()
            ),
            NotificationKind::Success,
            None,
        );
        info!("Restored {} to {}", snapshot.id, snapshot.status);
        UndoOutcome::Restored
    }

    fn register_undo(&self, snapshot: &Issue, token: &TransitionToken, to: IssueStatus) -> UndoToken {
        let undo = UndoToken::new(self.next_undo.get());
        self.next_undo.set(self.next_undo.get() + 1);

        let notification = self.notifications.notify(
            format!(
                "{}: {} moved from {} to {}",
                snapshot.id,
                snapshot.title,
                snapshot.status.label(),
                to.label()
            ),
            NotificationKind::Info,
            Some(undo),
        );
        self.undo_entries.borrow_mut().insert(
            undo,
            UndoEntry {
                snapshot: snapshot.clone(),
                token: token.clone(),
                notification,
            },
        );
        undo
    }

    fn roll_back(
        &self,
        snapshot: Issue,
        token: &TransitionToken,
        undo: UndoToken,
        err: EngineError,
    ) -> DropOutcome {
        let entry = self.undo_entries.borrow_mut().remove(&undo);

        if !self.engine.revert_transition(token, snapshot) {
            debug!("Persist of {} failed after a later change; not reverting", token.issue_id());
            return DropOutcome::Superseded;
        }

        warn!("Reverted {}: {}", token.issue_id(), err);
        if let Some(entry) = entry {
            self.notifications.dismiss(entry.notification);
        }
        self.notifications
            .notify(UPDATE_FAILED_MESSAGE, NotificationKind::Error, None);
        DropOutcome::Reverted(err)
    }

    /// Back to Idle unless a newer gesture has taken over.
    fn finish_commit(&self, gesture: u64) {
        let mut state = self.state.borrow_mut();
        if matches!(*state, DragState::Committing { gesture: g } if g == gesture) {
            *state = DragState::Idle;
        }
    }

    fn prune_undo_entries(&self) {
        let notifications = &self.notifications;
        self.undo_entries
            .borrow_mut()
            .retain(|_, entry| notifications.is_active(entry.notification));
    }
}
