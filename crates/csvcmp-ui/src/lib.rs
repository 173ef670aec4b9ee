//! State models for the run configuration surfaces.
//!
//! Every controller here is a plain state object with pure transition
//! methods and view projections; rendering and I/O stay with the caller.
//! That keeps the step machine, the recommendation panel, the mapping
//! editor, and the issue filter testable without any UI runtime.

pub mod editor;
pub mod issues;
pub mod recommend;
pub mod wizard;

pub use editor::{MappingRow, MappingTableEditor, RowView, TableMode};
pub use issues::{IssueFilterState, IssueTable};
pub use recommend::{
    ColumnSource, RecommendPanel, RecommendStatus, RefreshDebounce, RefreshGeneration,
    refresh_if_ready, refresh_recommendations, resolve_columns,
};
pub use wizard::{FileSource, MappingChoice, RunMode, RunSummary, StepDef, StepView, WizardState};
