//! Priority ranking for issues
//!
//! `priority = severity * 10 - days_since_created + user_defined_rank`,
//! recomputed on demand and never stored. Board order is descending
//! priority, newest first on ties.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::Issue;

/// Weight of one severity step
pub const SEVERITY_WEIGHT: i64 = 10;

/// Whole days elapsed between `created_at` and `now`, truncated toward zero.
///
/// An issue created 23 hours ago is 0 days old.
pub fn days_since_created(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days()
}

/// Priority of `issue` as seen at `now`.
///
/// Unbounded and unclamped: out-of-range severities and negative ranks
/// contribute linearly.
pub fn calculate_priority_at(issue: &Issue, now: DateTime<Utc>) -> i64 {
    i64::from(issue.severity) * SEVERITY_WEIGHT - days_since_created(issue.created_at, now)
        + i64::from(issue.user_defined_rank)
}

/// Priority of `issue` against the wall clock.
pub fn calculate_priority(issue: &Issue) -> i64 {
    calculate_priority_at(issue, Utc::now())
}

/// Board ordering: higher priority first, then more recent `created_at`.
pub fn compare_by_priority(a: &Issue, b: &Issue, now: DateTime<Utc>) -> Ordering {
    calculate_priority_at(b, now)
        .cmp(&calculate_priority_at(a, now))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Borrowing form of the board order, used by the engine's view rebuild.
///
/// Issues equal on both priority and creation instant keep their input order.
pub fn rank_by_priority<'a>(
    issues: impl IntoIterator<Item = &'a Issue>,
    now: DateTime<Utc>,
) -> Vec<&'a Issue> {
    let mut ranked: Vec<(i64, &Issue)> = issues
        .into_iter()
        .map(|issue| (calculate_priority_at(issue, now), issue))
        .collect();

    // sort_by is stable, which keeps exact ties in input order
    ranked.sort_by(|(pa, a), (pb, b)| pb.cmp(pa).then_with(|| b.created_at.cmp(&a.created_at)));

    ranked.into_iter().map(|(_, issue)| issue).collect()
}

/// Return a new vector of `issues` in board order as seen at `now`.
///
/// The input slice is left untouched.
pub fn sort_issues_by_priority_at(issues: &[Issue], now: DateTime<Utc>) -> Vec<Issue> {
    rank_by_priority(issues, now).into_iter().cloned().collect()
}

/// Return a new vector of `issues` in board order against the wall clock.
pub fn sort_issues_by_priority(issues: &[Issue]) -> Vec<Issue> {
    sort_issues_by_priority_at(issues, Utc::now())
}
