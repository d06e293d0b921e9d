//! Transient user notifications
//!
//! Each entry expires a fixed time after it was raised and can be dismissed
//! early. Entries may carry an [`UndoToken`]; the channel never interprets
//! it, whoever raised the notification resolves it on `take_undo`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

/// Lifetime of a notification
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to an undoable action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(u64);

impl UndoToken {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub undo: Option<UndoToken>,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process notification list with time-based expiry
pub struct NotificationChannel {
    entries: RefCell<Vec<Notification>>,
    /// Every notification ever raised, oldest first
    history: RefCell<Vec<Notification>>,
    next_id: Cell<u64>,
    ttl: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            ttl,
        }
    }

    /// Raise a notification; it expires after the channel's TTL.
    pub fn notify(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        undo: Option<UndoToken>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let notification = Notification {
            id,
            message: message.into(),
            kind,
            undo,
            expires_at: Instant::now() + self.ttl,
        };
        debug!("Notify {} [{}]: {}", id, kind, notification.message);

        self.history.borrow_mut().push(notification.clone());
        self.entries.borrow_mut().push(notification);
        id
    }

    /// Remove a notification before it expires. Returns whether it was live.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.sweep();
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        let removed = entries.len() < before;
        if removed {
            trace!("Dismissed notification {}", id);
        }
        removed
    }

    /// Remove a live notification and hand back its undo token.
    ///
    /// Returns `None` if the notification expired, was dismissed, or never
    /// carried a token.
    pub fn take_undo(&self, id: NotificationId) -> Option<UndoToken> {
        self.sweep();
        let mut entries = self.entries.borrow_mut();
        let index = entries.iter().position(|n| n.id == id)?;
        entries[index].undo?;
        entries.remove(index).undo
    }

    /// Live notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.sweep();
        self.entries.borrow().clone()
    }

    pub fn is_active(&self, id: NotificationId) -> bool {
        self.sweep();
        self.entries.borrow().iter().any(|n| n.id == id)
    }

    /// Everything raised so far, expired and dismissed entries included
    pub fn history(&self) -> Vec<Notification> {
        self.history.borrow().clone()
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.entries.borrow_mut().retain(|n| !n.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notify_assigns_increasing_ids() {
        let channel = NotificationChannel::new();
        let a = channel.notify("first", NotificationKind::Info, None);
        let b = channel.notify("second", NotificationKind::Success, None);
        assert!(b > a);
        let messages: Vec<_> = channel.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let channel = NotificationChannel::new();
        let id = channel.notify("moved", NotificationKind::Info, None);

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(channel.is_active(id));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!channel.is_active(id));
        assert!(channel.active().is_empty());
        assert_eq!(channel.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss() {
        let channel = NotificationChannel::new();
        let id = channel.notify("x", NotificationKind::Error, None);
        assert!(channel.dismiss(id));
        assert!(!channel.dismiss(id));
        assert!(channel.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_undo_once() {
        let channel = NotificationChannel::new();
        let token = UndoToken::new(7);
        let id = channel.notify("moved", NotificationKind::Info, Some(token));

        assert_eq!(channel.take_undo(id), Some(token));
        assert_eq!(channel.take_undo(id), None);
        assert!(!channel.is_active(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_undo_without_token_keeps_entry() {
        let channel = NotificationChannel::new();
        let id = channel.notify("saved", NotificationKind::Success, None);
        assert_eq!(channel.take_undo(id), None);
        assert!(channel.is_active(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_undo_after_expiry() {
        let channel = NotificationChannel::with_ttl(Duration::from_millis(100));
        let id = channel.notify("moved", NotificationKind::Info, Some(UndoToken::new(1)));
        tokio::time::advance(Duration::from_millis(150)).await;
        assert_eq!(channel.take_undo(id), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NotificationKind::Error.to_string(), "error");
        assert_eq!(NotificationId(3).to_string(), "#3");
    }
}
