//! Recommendation scoring for saved mappings.
//!
//! A saved mapping is scored against the columns of the files the user has
//! selected: the ratio of the mapping's target columns (plus key columns)
//! found in the supplied column sets, as a percentage. Header comparison is
//! insensitive to case and punctuation.

use std::collections::BTreeSet;

use csvcmp_model::MappingSummary;

/// Minimum score at which the top recommendation is auto-selected.
///
/// Tunable; the value carries no structural meaning.
pub const AUTO_SELECT_MIN_SCORE: u8 = 60;

/// Raw match counts for one side of a mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCount {
    /// Targets found in the supplied column set.
    pub matches: usize,
    /// Targets the mapping declares for this side.
    pub total: usize,
}

/// A saved mapping ranked against the selected files.
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Mapping name.
    pub name: String,
    /// Number of field rules in the mapping.
    pub field_count: usize,
    /// Match percentage, 0 to 100.
    pub score: u8,
    /// Human-readable evidence, e.g. `"Left 3/3"`.
    pub reasons: Vec<String>,
    pub left: MatchCount,
    pub right: MatchCount,
}

/// Normalizes a header name for comparison: lowercased with every character
/// outside `[a-z0-9]` removed.
#[must_use]
pub fn normalize_header(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Scores every summary and returns the ones that matched anything, sorted
/// by descending score. Ties keep the summaries' original order.
#[must_use]
pub fn build_recommendations(
    summaries: &[MappingSummary],
    left_columns: &[String],
    right_columns: &[String],
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = summaries
        .iter()
        .map(|summary| score_summary(summary, left_columns, right_columns))
        .filter(|rec| rec.score > 0)
        .collect();
    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations
}

/// Scores a single summary against the supplied column sets.
#[must_use]
pub fn score_summary(
    summary: &MappingSummary,
    left_columns: &[String],
    right_columns: &[String],
) -> Recommendation {
    let left_pool: BTreeSet<String> = left_columns.iter().map(|c| normalize_header(c)).collect();
    let right_pool: BTreeSet<String> = right_columns.iter().map(|c| normalize_header(c)).collect();

    // Key columns count toward both matches and totals, even when the key
    // duplicates a declared column.
    let mut left_targets = dedup_non_empty(&summary.left_columns);
    let mut right_targets = dedup_non_empty(&summary.right_columns);
    if let Some(key) = summary.left_key() {
        left_targets.push(key.to_string());
    }
    if let Some(key) = summary.right_key() {
        right_targets.push(key.to_string());
    }

    let left = count_matches(&left_targets, &left_pool);
    let right = count_matches(&right_targets, &right_pool);
    let total = left.total + right.total;
    let matches = left.matches + right.matches;
    let score = if total > 0 {
        (100.0 * matches as f64 / total as f64).round() as u8
    } else {
        0
    };

    let mut reasons = Vec::new();
    if left.total > 0 {
        reasons.push(format!("Left {}/{}", left.matches, left.total));
    }
    if right.total > 0 {
        reasons.push(format!("Right {}/{}", right.matches, right.total));
    }
    let key_total =
        usize::from(summary.left_key().is_some()) + usize::from(summary.right_key().is_some());
    if key_total > 0 {
        let key_matches = usize::from(
            summary
                .left_key()
                .is_some_and(|key| left_pool.contains(&normalize_header(key))),
        ) + usize::from(
            summary
                .right_key()
                .is_some_and(|key| right_pool.contains(&normalize_header(key))),
        );
        reasons.push(format!("Keys {key_matches}/{key_total}"));
    }

    Recommendation {
        name: summary.name.clone(),
        field_count: summary.field_count,
        score,
        reasons,
        left,
        right,
    }
}

fn dedup_non_empty(columns: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut targets = Vec::new();
    for column in columns {
        if column.is_empty() {
            continue;
        }
        if seen.insert(column.clone()) {
            targets.push(column.clone());
        }
    }
    targets
}

fn count_matches(targets: &[String], pool: &BTreeSet<String>) -> MatchCount {
    let matches = targets
        .iter()
        .filter(|target| pool.contains(&normalize_header(target)))
        .count();
    MatchCount {
        matches,
        total: targets.len(),
    }
}
