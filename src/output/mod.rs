//! Output formatting module for the kanban CLI
//!
//! Renders board columns, issue cards, the detail page and notifications as
//! plain text.

use chrono::{DateTime, Utc};
use kanban_core::{
    BoardColumns, FilterOptions, Issue, IssueDetail, Notification, calculate_priority_at,
};

/// Maximum width for a card title before truncation
const MAX_TITLE_WIDTH: usize = 40;

/// Truncate a string to the specified maximum width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    }
}

/// Format tags as `#a #b`, or an empty string.
fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One card line:
///
/// ```text
/// ISSUE-001  Login page returns 500 on expired...  [P57 Critical] @alice #auth
/// ```
pub fn format_card(issue: &Issue, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{}  {:<title_w$}  [P{} {}]",
        issue.id,
        truncate(&issue.title, MAX_TITLE_WIDTH),
        calculate_priority_at(issue, now),
        issue.severity_label(),
        title_w = MAX_TITLE_WIDTH,
    );
    if !issue.assignee.is_empty() {
        line.push_str(&format!(" @{}", issue.assignee));
    }
    let tags = format_tags(&issue.tags);
    if !tags.is_empty() {
        line.push(' ');
        line.push_str(&tags);
    }
    line
}

/// Format the columns in board order, cards in priority order.
pub fn format_columns(columns: &BoardColumns, now: DateTime<Utc>) -> String {
    let mut output = String::new();
    for (status, issues) in columns.iter() {
        output.push_str(&format!("{} ({})\n", status.label(), issues.len()));
        if issues.is_empty() {
            output.push_str("  (empty)\n");
        }
        for issue in issues {
            output.push_str(&format!("  {}\n", format_card(issue, now)));
        }
        output.push('\n');
    }
    output.trim_end().to_string()
}

/// Describe the active filters, or `None` when nothing is filtered.
pub fn format_filters(filters: &FilterOptions) -> Option<String> {
    if !filters.is_active() {
        return None;
    }
    let mut parts = Vec::new();
    if !filters.search_query.is_empty() {
        parts.push(format!("search \"{}\"", filters.search_query));
    }
    if let Some(assignee) = filters.assignee.as_deref().filter(|a| !a.is_empty()) {
        parts.push(format!("assignee {}", assignee));
    }
    if let Some(severity) = filters.severity {
        parts.push(format!("severity {}", severity));
    }
    Some(format!("Filters: {}", parts.join(", ")))
}

pub fn format_last_synced(last_synced_at: Option<DateTime<Utc>>) -> String {
    match last_synced_at {
        Some(at) => format!("Last synced: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "Last synced: never".to_string(),
    }
}

/// Notifications, one per line: `[kind] message`
pub fn format_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|n| format!("[{}] {}", n.kind, n.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the issue detail page.
pub fn format_detail(detail: &IssueDetail) -> String {
    let issue = &detail.issue;
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", issue.id, issue.title));
    output.push_str(&format!("{}\n", "=".repeat(issue.id.len() + issue.title.len() + 2)));
    output.push_str(&format!("Status:    {}\n", detail.status_label));
    output.push_str(&format!(
        "Severity:  {} ({})\n",
        detail.severity_label, issue.severity
    ));
    output.push_str(&format!("Priority:  {}\n", detail.priority));
    let assignee = if issue.assignee.is_empty() {
        "-"
    } else {
        issue.assignee.as_str()
    };
    output.push_str(&format!("Assignee:  {}\n", assignee));
    if !issue.tags.is_empty() {
        output.push_str(&format!("Tags:      {}\n", issue.tags.join(", ")));
    }
    output.push_str(&format!(
        "Created:   {}\n",
        issue.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "Updated:   {}\n",
        issue.updated_at.format("%Y-%m-%d %H:%M")
    ));

    if !issue.description.is_empty() {
        output.push('\n');
        output.push_str(&issue.description);
        output.push('\n');
    }
    if detail.can_resolve {
        output.push_str(&format!("\nResolve with: kanban resolve {}\n", issue.id));
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use kanban_core::{IssueStatus, NotificationChannel, NotificationKind, User, UserRole};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn issue() -> Issue {
        Issue::new("ISSUE-001", "Login broken", now() - Duration::days(3))
            .with_severity(5)
            .with_rank(10)
            .with_assignee("alice")
            .with_tags(["auth", "Bug"])
    }

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_tiny_width() {
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_card() {
        let card = format_card(&issue(), now());
        assert!(card.starts_with("ISSUE-001  Login broken"));
        assert!(card.contains("[P57 Critical]"));
        assert!(card.ends_with("@alice #auth #Bug"));
    }

    #[test]
    fn test_format_card_without_assignee_or_tags() {
        let bare = Issue::new("ISSUE-002", "Bare", now());
        let card = format_card(&bare, now());
        assert!(card.ends_with("[P10 Minor]"));
    }

    #[test]
    fn test_format_filters() {
        assert_eq!(format_filters(&FilterOptions::new()), None);
        let filters = FilterOptions::new().with_search("bug").with_severity(5);
        assert_eq!(
            format_filters(&filters).unwrap(),
            "Filters: search \"bug\", severity 5"
        );
    }

    #[test]
    fn test_format_last_synced() {
        assert_eq!(format_last_synced(None), "Last synced: never");
        assert_eq!(
            format_last_synced(Some(now())),
            "Last synced: 2024-06-01 12:00:00 UTC"
        );
    }

    #[test]
    fn test_format_detail() {
        let detail = IssueDetail::new(issue(), &User::new("Alice", UserRole::Admin), now());
        let output = format_detail(&detail);
        assert!(output.contains("Status:    Backlog"));
        assert!(output.contains("Severity:  Critical (5)"));
        assert!(output.contains("Priority:  57"));
        assert!(output.contains("kanban resolve ISSUE-001"));

        let done = IssueDetail::new(
            issue().with_status(IssueStatus::Done),
            &User::new("Alice", UserRole::Admin),
            now(),
        );
        assert!(!format_detail(&done).contains("kanban resolve"));
    }

    #[tokio::test]
    async fn test_format_notifications() {
        let channel = NotificationChannel::new();
        channel.notify("moved", NotificationKind::Info, None);
        channel.notify("Failed", NotificationKind::Error, None);
        assert_eq!(
            format_notifications(&channel.history()),
            "[info] moved\n[error] Failed"
        );
    }
}
