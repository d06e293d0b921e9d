//! Board filters
//!
//! Search, assignee and severity filters compose with AND semantics. Empty
//! search text and an empty assignee mean "no filter".

use crate::models::Issue;

/// Active filter criteria for the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Case-insensitive substring matched against title and tags
    pub search_query: String,
    /// Exact assignee match
    pub assignee: Option<String>,
    /// Exact severity match
    pub severity: Option<i32>,
}

impl FilterOptions {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_severity(mut self, severity: i32) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Check whether any criterion is active
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty()
            || self.assignee.as_deref().is_some_and(|a| !a.is_empty())
            || self.severity.is_some()
    }

    /// Merge `patch` into these options; unspecified fields are retained.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(query) = patch.search_query {
            self.search_query = query;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
    }

    /// Issues passing every active criterion, input order preserved.
    ///
    /// Applied as search, then assignee, then severity.
    pub fn apply<'a>(&self, issues: &'a [Issue]) -> Vec<&'a Issue> {
        let query = self.search_query.to_lowercase();

        issues
            .iter()
            .filter(|issue| query.is_empty() || matches_search(issue, &query))
            .filter(|issue| match self.assignee.as_deref() {
                Some(assignee) if !assignee.is_empty() => issue.assignee == assignee,
                _ => true,
            })
            .filter(|issue| self.severity.is_none_or(|s| issue.severity == s))
            .collect()
    }

    /// Whether a single issue passes the filter
    pub fn matches(&self, issue: &Issue) -> bool {
        !self.apply(std::slice::from_ref(issue)).is_empty()
    }
}

/// `query` must already be lowercase.
fn matches_search(issue: &Issue, query: &str) -> bool {
    issue.title.to_lowercase().contains(query)
        || issue.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}

/// Partial filter change
///
/// `None` leaves a field unchanged. For `assignee` and `severity`,
/// `Some(None)` clears the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search_query: Option<String>,
    pub assignee: Option<Option<String>>,
    pub severity: Option<Option<i32>>,
}

impl FilterPatch {
    /// Create a new empty patch
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(Some(assignee.into()));
        self
    }

    pub fn clear_assignee(mut self) -> Self {
        self.assignee = Some(None);
        self
    }

    pub fn severity(mut self, severity: i32) -> Self {
        self.severity = Some(Some(severity));
        self
    }

    pub fn clear_severity(mut self) -> Self {
        self.severity = Some(None);
        self
    }
}

impl From<FilterOptions> for FilterPatch {
    /// A patch that replaces every field
    fn from(options: FilterOptions) -> Self {
        Self {
            search_query: Some(options.search_query),
            assignee: Some(options.assignee),
            severity: Some(options.severity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn issues() -> Vec<Issue> {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        vec![
            Issue::new("ISSUE-001", "Login page broken", created)
                .with_tags(["auth"])
                .with_assignee("alice")
                .with_severity(5),
            Issue::new("ISSUE-002", "Crash when saving", created)
                .with_tags(["Bug", "editor"])
                .with_assignee("bob")
                .with_severity(4),
            Issue::new("ISSUE-003", "Debug logging too noisy", created)
                .with_assignee("alice")
                .with_severity(2),
            Issue::new("ISSUE-004", "Dark mode", created)
                .with_tags(["ui"])
                .with_assignee("carol")
                .with_severity(1),
        ]
    }

    fn ids(found: &[&Issue]) -> Vec<String> {
        found.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let all = issues();
        assert_eq!(FilterOptions::new().apply(&all).len(), 4);
        assert!(!FilterOptions::new().is_active());
    }

    #[test]
    fn test_search_matches_tag_case_insensitively() {
        let all = issues();
        let found = FilterOptions::new().with_search("bug").apply(&all);
        // tag "Bug" on 002, title "Debug" on 003
        assert_eq!(ids(&found), vec!["ISSUE-002", "ISSUE-003"]);
    }

    #[test]
    fn test_search_matches_title() {
        let all = issues();
        let found = FilterOptions::new().with_search("LOGIN").apply(&all);
        assert_eq!(ids(&found), vec!["ISSUE-001"]);
    }

    #[test]
    fn test_assignee_exact_match() {
        let all = issues();
        let found = FilterOptions::new().with_assignee("alice").apply(&all);
        assert_eq!(ids(&found), vec!["ISSUE-001", "ISSUE-003"]);

        let none = FilterOptions::new().with_assignee("Alice").apply(&all);
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_assignee_is_no_filter() {
        let all = issues();
        let filter = FilterOptions::new().with_assignee("");
        assert_eq!(filter.apply(&all).len(), 4);
        assert!(!filter.is_active());
    }

    #[test]
    fn test_severity_exact_match() {
        let all = issues();
        let found = FilterOptions::new().with_severity(4).apply(&all);
        assert_eq!(ids(&found), vec!["ISSUE-002"]);
    }

    #[test]
    fn test_filters_compose_as_and() {
        let all = issues();
        let found = FilterOptions::new()
            .with_search("o")
            .with_assignee("alice")
            .with_severity(2)
            .apply(&all);
        assert_eq!(ids(&found), vec!["ISSUE-003"]);
    }

    #[test]
    fn test_matches_single_issue() {
        let all = issues();
        let filter = FilterOptions::new().with_severity(1);
        assert!(filter.matches(&all[3]));
        assert!(!filter.matches(&all[0]));
    }

    #[test]
    fn test_merge_retains_unspecified_fields() {
        let mut options = FilterOptions::new().with_search("crash").with_severity(4);
        options.merge(FilterPatch::new().assignee("bob"));
        assert_eq!(options.search_query, "crash");
        assert_eq!(options.severity, Some(4));
        assert_eq!(options.assignee.as_deref(), Some("bob"));
    }

    #[test]
    fn test_merge_clears() {
        let mut options = FilterOptions::new().with_assignee("bob").with_severity(4);
        options.merge(FilterPatch::new().clear_assignee().clear_severity());
        assert_eq!(options, FilterOptions::new());
    }

    #[test]
    fn test_patch_from_options_replaces_all() {
        let mut options = FilterOptions::new().with_search("x").with_severity(3);
        options.merge(FilterPatch::from(FilterOptions::new().with_assignee("carol")));
        assert_eq!(options, FilterOptions::new().with_assignee("carol"));
    }
}
