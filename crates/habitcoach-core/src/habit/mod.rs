//! Habit definitions and the append-only completion log.
//!
//! Habits are owned by the user and read-only to the engines. Completions
//! are immutable; several may land on the same calendar day and consumers
//! de-duplicate by local date where it matters.

mod ingest;

pub use ingest::{ingest_completions, CompletionRecord, IngestReport};

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Broad grouping used by the suggestion and scheduling heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Health,
    Fitness,
    Nutrition,
    Sleep,
    MentalHealth,
    Social,
    Learning,
    Productivity,
    Other,
}

impl HabitCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HabitCategory::Health => "health",
            HabitCategory::Fitness => "fitness",
            HabitCategory::Nutrition => "nutrition",
            HabitCategory::Sleep => "sleep",
            HabitCategory::MentalHealth => "mental health",
            HabitCategory::Social => "social",
            HabitCategory::Learning => "learning",
            HabitCategory::Productivity => "productivity",
            HabitCategory::Other => "other",
        }
    }
}

/// How often a habit is meant to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    Daily,
    Weekly,
    Custom,
}

/// A user-defined habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub category: HabitCategory,
    pub frequency: HabitFrequency,
    /// Target amount per completion day, in `unit`
    pub target_value: f64,
    /// Free-form unit such as "glasses" or "minutes"
    pub unit: String,
    /// Habits are deactivated, never deleted
    pub is_active: bool,
}

impl Habit {
    /// Whether the title reads like a hydration habit.
    pub fn is_hydration(&self) -> bool {
        const KEYWORDS: [&str; 4] = ["water", "drink", "hydrate", "glass"];
        let title = self.title.to_lowercase();
        KEYWORDS.iter().any(|k| title.contains(k))
    }
}

/// One logged completion of a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub habit_id: String,
    pub completed_at: DateTime<Utc>,
    pub value: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl HabitCompletion {
    /// Calendar date of the completion in the caller's zone.
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.completed_at.with_timezone(offset).date_naive()
    }

    /// Fractional hour of day (hour + minute/60) in the caller's zone.
    pub fn local_hour(&self, offset: &FixedOffset) -> f64 {
        let local = self.completed_at.with_timezone(offset);
        local.hour() as f64 + local.minute() as f64 / 60.0
    }
}

/// Completions belonging to one habit, in log order.
pub fn completions_for<'a>(
    completions: &'a [HabitCompletion],
    habit_id: &str,
) -> Vec<&'a HabitCompletion> {
    completions.iter().filter(|c| c.habit_id == habit_id).collect()
}

/// Distinct local completion dates, ascending.
pub fn distinct_dates<'a, I>(completions: I, offset: &FixedOffset) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a HabitCompletion>,
{
    completions
        .into_iter()
        .map(|c| c.local_date(offset))
        .collect()
}
