//! Mapping documents and the read-only summaries derived from them.
//!
//! A [`MappingSpec`] is the persisted configuration describing how left-file
//! columns correspond to right-file columns for a comparison run. A
//! [`MappingSummary`] is the compact, read-only projection that the run
//! wizard scores candidate columns against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Compact description of a saved mapping, used for recommendation scoring.
///
/// Supplied once per session (the wizard reads the full set at startup) and
/// immutable thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSummary {
    /// Mapping name (the store filename).
    pub name: String,
    /// Number of field rules in the mapping.
    #[serde(default)]
    pub field_count: usize,
    /// Left-side key column, if declared.
    #[serde(default)]
    pub left_key: Option<String>,
    /// Right-side key column, if declared.
    #[serde(default)]
    pub right_key: Option<String>,
    /// Left columns referenced by field rules, in field order.
    #[serde(default)]
    pub left_columns: Vec<String>,
    /// Right columns referenced by field rules, in field order.
    #[serde(default)]
    pub right_columns: Vec<String>,
}

impl MappingSummary {
    /// Left key, treating an empty string the same as absent.
    #[must_use]
    pub fn left_key(&self) -> Option<&str> {
        self.left_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Right key, treating an empty string the same as absent.
    #[must_use]
    pub fn right_key(&self) -> Option<&str> {
        self.right_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Metadata block of a mapping document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingMeta {
    /// Display name of the mapping.
    pub name: String,
    /// Creation timestamp (ISO 8601), set by the store on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Key columns used to align rows between the two files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingKeys {
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
}

/// A single field rule: one left/right column pair plus its transforms.
///
/// Rule order is significant; a rule's position in the list is its ordinal
/// in the editor and in serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field name shown in the editor and used as the rule identifier.
    pub name: String,
    /// Source column in the left file.
    #[serde(default)]
    pub left: String,
    /// Target column in the right file.
    #[serde(default)]
    pub right: String,
    /// Whether the field is excluded from comparison.
    #[serde(default)]
    pub skip: bool,
    /// Normalization steps applied before comparing (e.g. "trim", "upper").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normalize: Vec<String>,
    /// Optional literal value translation applied to the left side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<BTreeMap<String, String>>,
}

impl FieldRule {
    /// Creates a bare rule with just the column pair set.
    #[must_use]
    pub fn new(name: &str, left: &str, right: &str) -> Self {
        Self {
            name: name.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            ..Self::default()
        }
    }
}

/// Full persisted mapping document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSpec {
    #[serde(default)]
    pub meta: MappingMeta,
    #[serde(default)]
    pub keys: MappingKeys,
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

impl MappingSpec {
    /// Derives the read-only summary used for recommendation scoring.
    ///
    /// Columns are collected in field order; empty column references are
    /// dropped. Empty key strings become absent keys.
    #[must_use]
    pub fn summary(&self) -> MappingSummary {
        let left_columns = self
            .fields
            .iter()
            .map(|field| field.left.clone())
            .filter(|column| !column.is_empty())
            .collect();
        let right_columns = self
            .fields
            .iter()
            .map(|field| field.right.clone())
            .filter(|column| !column.is_empty())
            .collect();
        MappingSummary {
            name: self.meta.name.clone(),
            field_count: self.fields.len(),
            left_key: non_empty(&self.keys.left),
            right_key: non_empty(&self.keys.right),
            left_columns,
            right_columns,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
