//! Validation issues as they appear in a run's issues table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueSeverity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

impl FromStr for IssueSeverity {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(ModelError::Message(format!("unknown severity: {other}"))),
        }
    }
}

/// A single row of a run's issues table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Record key or row reference the issue points at.
    #[serde(default)]
    pub record_key: String,
    pub severity: IssueSeverity,
    /// Issue type, e.g. "missing_column" or "value_mismatch".
    pub issue_type: String,
    /// Column the issue concerns, if any.
    #[serde(default)]
    pub column: Option<String>,
    pub message: String,
}

impl Issue {
    /// Combined lowercase text of the row, the haystack for free-text search.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.record_key);
        text.push(' ');
        text.push_str(&self.severity.to_string());
        text.push(' ');
        text.push_str(&self.issue_type);
        if let Some(column) = &self.column {
            text.push(' ');
            text.push_str(column);
        }
        text.push(' ');
        text.push_str(&self.message);
        text.to_lowercase()
    }
}
