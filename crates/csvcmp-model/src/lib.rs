pub mod error;
pub mod issue;
pub mod mapping;
pub mod wire;

pub use error::{ModelError, Result};
pub use issue::{Issue, IssueSeverity};
pub use mapping::{FieldRule, MappingKeys, MappingMeta, MappingSpec, MappingSummary};
pub use wire::{ColumnsPayload, GuessSuggestion};
