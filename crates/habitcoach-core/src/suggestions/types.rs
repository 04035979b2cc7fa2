//! Suggestion types.

use serde::{Deserialize, Serialize};

use crate::habit::HabitFrequency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionType {
    DifficultyIncrease,
    DifficultyDecrease,
    TimingOptimization,
    FrequencyChange,
    HabitStacking,
}

/// The concrete change a suggestion proposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestedChange {
    Target { from: f64, to: f64 },
    Time { from_hour: f64, to_hour: u32 },
    Frequency { from: HabitFrequency, to: HabitFrequency },
    StackAfter { habit_id: String },
}

/// A ranked, explainable change to one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSuggestion {
    pub habit_id: String,
    pub suggestion_type: SuggestionType,
    pub title: String,
    pub description: String,
    pub rationale: String,
    /// Fractional improvement in completion rate, e.g. 0.15
    pub expected_improvement: f64,
    /// 0.0-1.0
    pub confidence: f64,
    pub implementation: String,
    pub risks: Vec<String>,
    pub change: SuggestedChange,
}

impl AdaptiveSuggestion {
    /// Ranking key: expected improvement weighted by confidence.
    pub fn score(&self) -> f64 {
        self.expected_improvement * self.confidence
    }
}
