//! Adaptive suggestions.
//!
//! Combines a habit's raw completions with its mined patterns to propose
//! target, timing, frequency and stacking changes, ranked by
//! expected improvement weighted by confidence.

mod engine;
mod types;

pub use engine::{optimal_hour, rank, SuggestionConfig, SuggestionEngine, SuggestionInput};
pub use types::{AdaptiveSuggestion, SuggestedChange, SuggestionType};
