//! Column guess engine: best right-column candidate per left column.
//!
//! Fuzzy header similarity is the dominant signal, adjusted by a bonus when
//! both columns hold the same kind of values and by the overlap between the
//! actual values seen on each side.

use std::collections::{BTreeMap, BTreeSet};

use rapidfuzz::fuzz;

use csvcmp_model::GuessSuggestion;

use crate::score::normalize_header;

const TYPE_MATCH_BONUS: f64 = 15.0;
const HEADER_WEIGHT: f64 = 0.6;
const OVERLAP_WEIGHT: f64 = 0.4;
/// Sample values examined per column for type detection.
const TYPE_SAMPLE_LIMIT: usize = 200;
/// Runner-up candidates kept per left column.
const ALTERNATE_LIMIT: usize = 2;

/// Confidence level buckets for guess annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Short annotation label as rendered next to a suggestion.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "med",
            Self::Low => "low",
        }
    }
}

/// Bucket boundaries for [`ConfidenceLevel`].
///
/// The defaults are tunable constants, not structurally meaningful.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceThresholds {
    /// Minimum confidence for the high bucket (default: 80).
    pub high: u8,
    /// Minimum confidence for the medium bucket (default: 55).
    pub medium: u8,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 80,
            medium: 55,
        }
    }
}

impl ConfidenceThresholds {
    /// Buckets a confidence percentage.
    #[must_use]
    pub fn categorize(&self, confidence: u8) -> ConfidenceLevel {
        if confidence >= self.high {
            ConfidenceLevel::High
        } else if confidence >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Kind of values a column appears to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    Numeric,
    Email,
    Phone,
    Date,
    Text,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Text => "text",
        }
    }
}

/// Suggests the best right-column match for every left column.
///
/// Returns one suggestion per left column, in input order, each carrying the
/// highest-confidence right column plus up to two alternates.
#[must_use]
pub fn guess_mappings(
    left_columns: &[String],
    right_columns: &[String],
    left_samples: &BTreeMap<String, Vec<String>>,
    right_samples: &BTreeMap<String, Vec<String>>,
) -> Vec<GuessSuggestion> {
    let right_norm: BTreeMap<&str, String> = right_columns
        .iter()
        .map(|col| (col.as_str(), normalize_header(col)))
        .collect();
    let right_types: BTreeMap<&str, ValueType> = right_columns
        .iter()
        .map(|col| {
            let samples = right_samples.get(col).map_or(&[][..], Vec::as_slice);
            (col.as_str(), detect_type(samples))
        })
        .collect();

    let mut suggestions = Vec::with_capacity(left_columns.len());
    for left in left_columns {
        let left_norm = normalize_header(left);
        let empty = Vec::new();
        let left_values = left_samples.get(left).unwrap_or(&empty);
        let left_type = detect_type(left_values);

        let mut scored: Vec<(String, u8, Vec<String>)> = Vec::with_capacity(right_columns.len());
        for right in right_columns {
            let mut reasons = Vec::new();
            let header_score = if left_norm == right_norm[right.as_str()] {
                100.0
            } else {
                fuzz::ratio(left_norm.chars(), right_norm[right.as_str()].chars())
            };
            if header_score > 0.0 {
                reasons.push(format!("header fuzzy {}", header_score.round() as u8));
            }
            let type_bonus = if left_type == right_types[right.as_str()] {
                reasons.push(format!("type {}", left_type.name()));
                TYPE_MATCH_BONUS
            } else {
                0.0
            };
            let right_values = right_samples.get(right).unwrap_or(&empty);
            let overlap_pct = (overlap(left_values, right_values) * 100.0).floor();
            if overlap_pct > 0.0 {
                reasons.push(format!("overlap {overlap_pct:.0}%"));
            }
            let confidence = (header_score * HEADER_WEIGHT
                + type_bonus
                + overlap_pct * OVERLAP_WEIGHT)
                .floor()
                .min(100.0) as u8;
            scored.push((right.clone(), confidence, reasons));
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let (best_right, confidence, reasons) = match scored.first() {
            Some((right, confidence, reasons)) => {
                (Some(right.clone()), *confidence, reasons.clone())
            }
            None => (None, 0, Vec::new()),
        };
        let alternates = scored
            .iter()
            .skip(1)
            .take(ALTERNATE_LIMIT)
            .map(|(right, confidence, _)| (right.clone(), *confidence))
            .collect();
        suggestions.push(GuessSuggestion {
            left_column: left.clone(),
            best_right,
            confidence,
            reasons,
            alternates,
        });
    }
    suggestions
}

fn detect_type(values: &[String]) -> ValueType {
    let sample = &values[..values.len().min(TYPE_SAMPLE_LIMIT)];
    if sample.is_empty() {
        return ValueType::Text;
    }
    let numeric = sample.iter().filter(|v| is_numeric(v)).count();
    let emails = sample.iter().filter(|v| v.contains('@')).count();
    let phones = sample.iter().filter(|v| digit_count(v) >= 10).count();
    let dates = sample
        .iter()
        .filter(|v| v.contains('/') || v.contains('-'))
        .count();

    // First-listed wins ties.
    let candidates = [
        (numeric, ValueType::Numeric),
        (emails, ValueType::Email),
        (phones, ValueType::Phone),
        (dates, ValueType::Date),
    ];
    let mut best = (0, ValueType::Text);
    for (count, kind) in candidates {
        if count > best.0 {
            best = (count, kind);
        }
    }
    if best.0 > 0 { best.1 } else { ValueType::Text }
}

fn is_numeric(value: &str) -> bool {
    let without_dot = value.replacen('.', "", 1);
    !without_dot.is_empty() && without_dot.chars().all(|ch| ch.is_ascii_digit())
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(|ch| ch.is_ascii_digit()).count()
}

fn overlap(left_values: &[String], right_values: &[String]) -> f64 {
    let left: BTreeSet<String> = left_values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    let right: BTreeSet<String> = right_values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / left.len().max(1) as f64
}
