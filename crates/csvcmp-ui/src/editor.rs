//! State of the field-mapping editor table.
//!
//! The table exists in two shapes: the full rule editor with transforms and
//! a value map per row, and the reduced columns-only shape used while
//! drafting a mapping from guesses. Rows carry no stable identity; display
//! numbering is recomputed from position after every insert or removal.

use std::collections::BTreeMap;

use csvcmp_map::ConfidenceThresholds;
use csvcmp_model::GuessSuggestion;

/// Which shape of the mapping table is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    /// All rule columns: transforms, value map, skip flag.
    #[default]
    Full,
    /// Column pairs only, as used by the mapping draft step.
    Columns,
}

/// One editable row of the mapping table.
#[derive(Debug, Clone, Default)]
pub struct MappingRow {
    pub field_name: String,
    pub left_column: String,
    pub right_column: String,
    pub skip: bool,
    pub normalize: Vec<String>,
    pub value_map: Option<BTreeMap<String, String>>,
    /// Guess confidence in percent, when the row was filled from a guess.
    pub confidence: Option<u8>,
    /// Guess evidence text, empty for hand-entered rows.
    pub reason: String,
}

/// Render projection of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Position shown to the user, starting at 1.
    pub display_index: usize,
    /// Position used by skip lists in columns mode, starting at 0.
    pub skip_ordinal: Option<usize>,
    pub field_name: String,
    pub left_column: String,
    pub right_column: String,
    pub skip: bool,
    /// Formatted confidence, e.g. `"82% (high)"`.
    pub confidence: Option<String>,
    pub reason: String,
}

/// The mapping table and its edit operations.
#[derive(Debug, Clone, Default)]
pub struct MappingTableEditor {
    mode: TableMode,
    rows: Vec<MappingRow>,
    thresholds: ConfidenceThresholds,
}

impl MappingTableEditor {
    #[must_use]
    pub fn new(mode: TableMode) -> Self {
        Self {
            mode,
            rows: Vec::new(),
            thresholds: ConfidenceThresholds::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TableMode {
        self.mode
    }

    #[must_use]
    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    #[must_use]
    pub fn row_mut(&mut self, index: usize) -> Option<&mut MappingRow> {
        self.rows.get_mut(index)
    }

    /// Appends an empty row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(MappingRow::default());
        self.rows.len() - 1
    }

    /// Removes the row at `index`; later rows renumber automatically.
    /// Returns false when the index is out of range.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Fills rows from guess suggestions, matched by left column. A guess
    /// without a best candidate clears nothing; unmatched rows keep their
    /// current values.
    pub fn apply_guesses(&mut self, guesses: &[GuessSuggestion]) {
        for guess in guesses {
            let Some(best) = &guess.best_right else {
                continue;
            };
            for row in self
                .rows
                .iter_mut()
                .filter(|row| row.left_column == guess.left_column)
            {
                row.right_column = best.clone();
                row.confidence = Some(guess.confidence);
                row.reason = guess.reasons.join(", ");
            }
        }
    }

    /// Render states for every row, renumbered from current positions.
    #[must_use]
    pub fn row_views(&self) -> Vec<RowView> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                display_index: index + 1,
                skip_ordinal: if self.mode == TableMode::Columns {
                    Some(index)
                } else {
                    None
                },
                field_name: row.field_name.clone(),
                left_column: row.left_column.clone(),
                right_column: row.right_column.clone(),
                skip: row.skip,
                confidence: row.confidence.map(|pct| {
                    let level = self.thresholds.categorize(pct);
                    format!("{pct}% ({})", level.label())
                }),
                reason: row.reason.clone(),
            })
            .collect()
    }

    /// Count caption under the table.
    #[must_use]
    pub fn count_label(&self) -> String {
        match self.rows.len() {
            0 => "No fields yet".to_string(),
            n => format!("{n} fields"),
        }
    }
}
