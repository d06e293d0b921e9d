//! End-to-end tests for the board: hydrate, filter, drag, undo and resolve
//!
//! - `view` - filtered view and ordering
//! - `drag` - drag and drop transitions, persist failures
//! - `races` - undo and re-moves that overlap an in-flight persist
//! - `detail` - detail page and the resolve action

mod common;

use common::*;
use kanban_core::{
    DropOutcome, EngineError, FailureMode, FilterPatch, IssueStatus, NotificationKind,
    TransitionError, UndoOutcome, UserRole,
};
use std::time::Duration;

const FAILED: &str = "Failed to update issue. Change reverted.";

mod view {
    use super::*;

    #[tokio::test]
    async fn test_hydrated_view_is_priority_ordered() {
        let ctx = BoardContext::new().await;
        // 57, 39, 8, 0
        assert_eq!(
            ctx.view_ids(),
            vec!["ISSUE-001", "ISSUE-004", "ISSUE-002", "ISSUE-003"]
        );
    }

    #[tokio::test]
    async fn test_bug_search_matches_tag() {
        let ctx = BoardContext::new().await;
        ctx.engine.set_filters(FilterPatch::new().search("bug"));
        assert_eq!(ctx.view_ids(), vec!["ISSUE-001"]);
    }

    #[tokio::test]
    async fn test_set_filters_twice_is_same_view() {
        let ctx = BoardContext::new().await;
        let patch = FilterPatch::new().assignee("alice").severity(4);
        ctx.engine.set_filters(patch.clone());
        let first = ctx.engine.filtered_issues();
        ctx.engine.set_filters(patch);
        assert_eq!(ctx.engine.filtered_issues(), first);
        assert_eq!(ctx.view_ids(), vec!["ISSUE-004"]);
    }

    #[tokio::test]
    async fn test_moved_issue_follows_filter() {
        let ctx = BoardContext::new().await;
        ctx.engine.set_filters(FilterPatch::new().assignee("alice"));
        let drag = ctx.controller(UserRole::Admin);

        drag.begin_drag("ISSUE-004").unwrap();
        drag.end_drag(Some(IssueStatus::Done)).await.unwrap();

        let columns = ctx.engine.columns();
        assert_eq!(columns.done.len(), 1);
        assert_eq!(columns.done[0].id, "ISSUE-004");
        assert_eq!(columns.backlog.len(), 1);
    }
}

mod drag {
    use super::*;

    #[tokio::test]
    async fn test_contributor_drag_is_inert() {
        let ctx = BoardContext::new().await;
        let before = ctx.engine.issues();
        let drag = ctx.controller(UserRole::Contributor);

        assert!(matches!(
            drag.begin_drag("ISSUE-001"),
            Err(TransitionError::PermissionDenied { .. })
        ));
        assert_eq!(
            drag.end_drag(Some(IssueStatus::Done)).await,
            Err(TransitionError::NotDragging)
        );

        assert_eq!(ctx.engine.issues(), before);
        assert!(ctx.notifications.history().is_empty());
        assert_eq!(ctx.repo.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_persist_reverts_and_notifies_once() {
        let ctx = BoardContext::new().await;
        ctx.repo.fail_updates(FailureMode::Always);
        let before = ctx.engine.issues();
        let drag = ctx.controller(UserRole::Admin);

        drag.begin_drag("ISSUE-001").unwrap();
        let outcome = drag.end_drag(Some(IssueStatus::Done)).await.unwrap();

        assert!(matches!(
            outcome,
            DropOutcome::Reverted(EngineError::UpdateTransientFailure { .. })
        ));
        assert_eq!(ctx.status_of("ISSUE-001"), Some(IssueStatus::Backlog));
        assert_eq!(ctx.engine.issues(), before);
        assert_eq!(ctx.messages(NotificationKind::Error), vec![FAILED]);
        assert_eq!(
            ctx.messages(NotificationKind::Info),
            vec!["ISSUE-001: Login page broken moved from Backlog to Done"]
        );
    }

    #[tokio::test]
    async fn test_successful_move_reaches_repository() {
        let ctx = BoardContext::new().await;
        let drag = ctx.controller(UserRole::Admin);

        drag.begin_drag("ISSUE-002").unwrap();
        drag.end_drag(Some(IssueStatus::Done)).await.unwrap();

        assert_eq!(
            ctx.repo.stored("ISSUE-002").map(|i| i.status),
            Some(IssueStatus::Done)
        );
        assert_eq!(ctx.engine.issue("ISSUE-002"), ctx.repo.stored("ISSUE-002"));

        // a later hydrate agrees with the local state
        ctx.engine.hydrate().await.unwrap();
        assert_eq!(ctx.status_of("ISSUE-002"), Some(IssueStatus::Done));
    }

    #[tokio::test]
    async fn test_engine_usable_after_failure() {
        let ctx = BoardContext::new().await;
        ctx.repo.fail_updates(FailureMode::Next(1));
        let drag = ctx.controller(UserRole::Admin);

        drag.begin_drag("ISSUE-004").unwrap();
        drag.end_drag(Some(IssueStatus::InProgress)).await.unwrap();
        drag.begin_drag("ISSUE-004").unwrap();
        let outcome = drag.end_drag(Some(IssueStatus::InProgress)).await.unwrap();

        assert!(matches!(outcome, DropOutcome::Persisted(_)));
        assert_eq!(ctx.status_of("ISSUE-004"), Some(IssueStatus::InProgress));
        assert_eq!(ctx.messages(NotificationKind::Error).len(), 1);
    }
}

mod races {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_undo_during_persist_wins() {
        let ctx = BoardContext::with_latency(Duration::from_millis(500)).await;
        let drag = ctx.controller(UserRole::Admin);
        drag.begin_drag("ISSUE-004").unwrap();

        let user = async {
            tokio::task::yield_now().await;
            let moved = ctx.notifications.active()[0].id;
            drag.undo(moved)
        };
        let (outcome, undo) = tokio::join!(drag.end_drag(Some(IssueStatus::Done)), user);

        assert_eq!(undo, UndoOutcome::Restored);
        assert_eq!(outcome, Ok(DropOutcome::Superseded));
        assert_eq!(ctx.status_of("ISSUE-004"), Some(IssueStatus::Backlog));
        assert_eq!(
            ctx.messages(NotificationKind::Success),
            vec!["ISSUE-004: Crash on empty search restored to Backlog"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_undo_is_silent() {
        let ctx = BoardContext::with_latency(Duration::from_millis(500)).await;
        ctx.repo.fail_updates(FailureMode::Always);
        let drag = ctx.controller(UserRole::Admin);
        drag.begin_drag("ISSUE-001").unwrap();

        let user = async {
            tokio::task::yield_now().await;
            let moved = ctx.notifications.active()[0].id;
            drag.undo(moved)
        };
        let (outcome, undo) = tokio::join!(drag.end_drag(Some(IssueStatus::InProgress)), user);

        assert_eq!(undo, UndoOutcome::Restored);
        assert_eq!(outcome, Ok(DropOutcome::Superseded));
        assert!(ctx.messages(NotificationKind::Error).is_empty());
        assert_eq!(ctx.status_of("ISSUE-001"), Some(IssueStatus::Backlog));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_move_supersedes_first_failure() {
        let ctx = BoardContext::with_latency(Duration::from_millis(500)).await;
        ctx.repo.fail_updates(FailureMode::Next(1));
        let first = ctx.controller(UserRole::Admin);
        let second = ctx.controller(UserRole::Admin);

        first.begin_drag("ISSUE-002").unwrap();
        let later = async {
            tokio::task::yield_now().await;
            second.begin_drag("ISSUE-002").unwrap();
            second.end_drag(Some(IssueStatus::Done)).await
        };
        let (a, b) = tokio::join!(first.end_drag(Some(IssueStatus::Backlog)), later);

        assert_eq!(a, Ok(DropOutcome::Superseded));
        assert!(matches!(b, Ok(DropOutcome::Persisted(_))));
        assert_eq!(ctx.status_of("ISSUE-002"), Some(IssueStatus::Done));
        assert!(ctx.messages(NotificationKind::Error).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_overwrites_local_state() {
        let ctx = BoardContext::with_latency(Duration::from_millis(500)).await;
        ctx.engine
            .update_optimistic(
                "ISSUE-003",
                &kanban_core::IssueUpdate::status(IssueStatus::Backlog),
            )
            .unwrap();

        ctx.engine
            .sync_every(Duration::from_secs(10), Some(1), |_, result| {
                assert_eq!(result, &Ok(4));
            })
            .await;

        assert_eq!(ctx.status_of("ISSUE-003"), Some(IssueStatus::Done));
        assert_eq!(ctx.engine.last_synced_at(), Some(now()));
    }
}

mod detail {
    use super::*;
    use kanban_core::{ResolveOutcome, User, load_detail, resolve_issue};

    #[tokio::test]
    async fn test_detail_then_resolve() {
        let ctx = BoardContext::new().await;
        let admin = User::new("Alice", UserRole::Admin);

        let detail = load_detail(&ctx.engine, &ctx.notifications, &admin, "ISSUE-001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.priority, 57);
        assert!(detail.can_resolve);

        let outcome = resolve_issue(&ctx.engine, &ctx.notifications, &admin, "ISSUE-001")
            .await
            .unwrap();
        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
        assert_eq!(ctx.status_of("ISSUE-001"), Some(IssueStatus::Done));
        assert_eq!(
            ctx.messages(NotificationKind::Success),
            vec!["Issue marked as resolved"]
        );

        let again = load_detail(&ctx.engine, &ctx.notifications, &admin, "ISSUE-001")
            .await
            .unwrap()
            .unwrap();
        assert!(!again.can_resolve);
    }

    #[tokio::test]
    async fn test_detail_unknown_issue() {
        let ctx = BoardContext::new().await;
        let viewer = User::new("Bob", UserRole::Contributor);
        let detail = load_detail(&ctx.engine, &ctx.notifications, &viewer, "ISSUE-999")
            .await
            .unwrap();
        assert!(detail.is_none());
    }
}
