//! Wire shapes exchanged with the comparison backend.
//!
//! Deserialization is deliberately lenient: missing fields collapse to
//! empty values so a malformed payload degrades to "no data" instead of an
//! error surfaced to the caller.

use serde::{Deserialize, Serialize};

/// Response body of `GET /files/columns`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsPayload {
    #[serde(default)]
    pub left_columns: Vec<String>,
    #[serde(default)]
    pub right_columns: Vec<String>,
}

impl ColumnsPayload {
    /// True when neither side carries any columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left_columns.is_empty() && self.right_columns.is_empty()
    }
}

/// One element of the `GET /mapping/guess` response: the best right-column
/// candidate for a left column, with supporting evidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuessSuggestion {
    pub left_column: String,
    #[serde(default)]
    pub best_right: Option<String>,
    /// Confidence in percent, 0 to 100.
    #[serde(default)]
    pub confidence: u8,
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Runner-up candidates as `(column, confidence)` pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<(String, u8)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_suggestion_accepts_minimal_payload() {
        let raw = r#"{"left_column": "Email"}"#;
        let guess: GuessSuggestion = serde_json::from_str(raw).expect("lenient guess");
        assert_eq!(guess.left_column, "Email");
        assert_eq!(guess.best_right, None);
        assert_eq!(guess.confidence, 0);
        assert!(guess.reasons.is_empty());
    }
}
