//! Filter state over a run's issues table.
//!
//! The row set is fixed once loaded; filtering is a pure projection over
//! it. Free-text search is a lowercase substring test against the combined
//! row text; severity and kind filters match exactly when set.

use csvcmp_model::{Issue, IssueSeverity};

/// The loaded issue rows.
#[derive(Debug, Clone, Default)]
pub struct IssueTable {
    rows: Vec<Issue>,
}

impl IssueTable {
    #[must_use]
    pub fn new(rows: Vec<Issue>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Issue] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct issue types in first-seen order, for the kind dropdown.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !kinds.contains(&row.issue_type.as_str()) {
                kinds.push(&row.issue_type);
            }
        }
        kinds
    }
}

/// The three active filters above the table.
#[derive(Debug, Clone, Default)]
pub struct IssueFilterState {
    /// Free-text search, matched case-insensitively against the whole row.
    pub search: String,
    pub severity: Option<IssueSeverity>,
    pub kind: Option<String>,
}

impl IssueFilterState {
    /// True when no filter is active.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.search.trim().is_empty() && self.severity.is_none() && self.kind.is_none()
    }

    /// Whether a single row passes every active filter.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !issue.search_text().contains(&needle) {
            return false;
        }
        if self.severity.is_some_and(|severity| severity != issue.severity) {
            return false;
        }
        if self
            .kind
            .as_deref()
            .is_some_and(|kind| kind != issue.issue_type)
        {
            return false;
        }
        true
    }

    /// The rows currently visible, in table order.
    #[must_use]
    pub fn visible<'a>(&self, table: &'a IssueTable) -> Vec<&'a Issue> {
        table.rows().iter().filter(|row| self.matches(row)).collect()
    }
}
