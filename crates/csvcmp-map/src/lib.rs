//! Column mapping intelligence for comparison runs.
//!
//! Three concerns live here:
//!
//! - [`score`] ranks saved mappings against the column sets of the files a
//!   user has picked, producing the wizard's recommendation list.
//! - [`guess`] suggests a best right-column match per left column using
//!   fuzzy header matching, value type detection, and value overlap.
//! - [`store`] persists mapping documents as JSON files in a directory.

pub mod guess;
pub mod score;
pub mod store;

pub use guess::{ConfidenceLevel, ConfidenceThresholds, guess_mappings};
pub use score::{AUTO_SELECT_MIN_SCORE, MatchCount, Recommendation, build_recommendations};
pub use store::MappingStore;
