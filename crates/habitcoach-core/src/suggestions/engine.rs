//! Rule families that turn history and mined patterns into suggestions.
//!
//! Each active habit is evaluated independently by four rule families:
//! difficulty, timing, frequency and stacking. A family yields at most one
//! suggestion per habit.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{AdaptiveSuggestion, SuggestedChange, SuggestionType};
use crate::habit::{distinct_dates, Habit, HabitCategory, HabitCompletion, HabitFrequency};
use crate::patterns::{clock, format_hour, HabitPattern, PatternDetail, PatternType};

/// Thresholds for the suggestion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_difficulty_min_completions")]
    pub difficulty_min_completions: usize,
    #[serde(default = "default_increase_rate")]
    pub increase_rate: f64,
    #[serde(default = "default_decrease_rate")]
    pub decrease_rate: f64,
    #[serde(default = "default_timing_min_strength")]
    pub timing_min_strength: f64,
    /// Mean hour within this many hours of the optimum needs no change
    #[serde(default = "default_timing_tolerance_hours")]
    pub timing_tolerance_hours: f64,
    #[serde(default = "default_frequency_min_completions")]
    pub frequency_min_completions: usize,
    #[serde(default = "default_frequency_trend_threshold")]
    pub frequency_trend_threshold: f64,
    #[serde(default = "default_stacking_min_strength")]
    pub stacking_min_strength: f64,
}

fn default_difficulty_min_completions() -> usize {
    7
}
fn default_increase_rate() -> f64 {
    0.8
}
fn default_decrease_rate() -> f64 {
    0.3
}
fn default_timing_min_strength() -> f64 {
    0.7
}
fn default_timing_tolerance_hours() -> f64 {
    1.0
}
fn default_frequency_min_completions() -> usize {
    14
}
fn default_frequency_trend_threshold() -> f64 {
    0.2
}
fn default_stacking_min_strength() -> f64 {
    0.6
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            difficulty_min_completions: default_difficulty_min_completions(),
            increase_rate: default_increase_rate(),
            decrease_rate: default_decrease_rate(),
            timing_min_strength: default_timing_min_strength(),
            timing_tolerance_hours: default_timing_tolerance_hours(),
            frequency_min_completions: default_frequency_min_completions(),
            frequency_trend_threshold: default_frequency_trend_threshold(),
            stacking_min_strength: default_stacking_min_strength(),
        }
    }
}

const DIFFICULTY_WINDOW_DAYS: i64 = 7;
const FREQUENCY_RECENT_DAYS: i64 = 14;

/// Category-specific hour that tends to stick best.
pub fn optimal_hour(category: HabitCategory) -> u32 {
    match category {
        HabitCategory::Fitness => 8,
        HabitCategory::MentalHealth => 7,
        HabitCategory::Learning => 10,
        _ => 9,
    }
}

/// Read-only inputs for one suggestion run.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionInput<'a> {
    pub habits: &'a [Habit],
    pub completions: &'a [HabitCompletion],
    pub patterns: &'a [HabitPattern],
    pub as_of: DateTime<Utc>,
}

/// Generates ranked [`AdaptiveSuggestion`]s.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    config: SuggestionConfig,
    offset: FixedOffset,
}

impl SuggestionEngine {
    pub fn new(offset: FixedOffset) -> Self {
        Self::with_config(SuggestionConfig::default(), offset)
    }

    pub fn with_config(config: SuggestionConfig, offset: FixedOffset) -> Self {
        Self { config, offset }
    }

    /// Suggestions for all active habits, best first.
    pub fn generate(&self, input: &SuggestionInput<'_>) -> Vec<AdaptiveSuggestion> {
        let mut suggestions = Vec::new();

        for habit in input.habits.iter().filter(|h| h.is_active) {
            let history: Vec<&HabitCompletion> = input
                .completions
                .iter()
                .filter(|c| c.habit_id == habit.id && c.completed_at <= input.as_of)
                .collect();
            let patterns: Vec<&HabitPattern> = input
                .patterns
                .iter()
                .filter(|p| p.habit_id == habit.id)
                .collect();

            suggestions.extend(self.difficulty_adjustment(habit, &history, input.as_of));
            suggestions.extend(self.timing_optimization(habit, &patterns));
            suggestions.extend(self.frequency_change(habit, &history, input.as_of));
            suggestions.extend(self.habit_stacking(habit, &patterns, input.habits));
        }

        rank(&mut suggestions);
        tracing::debug!(count = suggestions.len(), "generated adaptive suggestions");
        suggestions
    }

    fn today(&self, as_of: DateTime<Utc>) -> NaiveDate {
        as_of.with_timezone(&self.offset).date_naive()
    }

    /// Fraction of days in `[from, to]` with at least one completion.
    fn day_rate(dates: &BTreeSet<NaiveDate>, from: NaiveDate, to: NaiveDate) -> Option<f64> {
        let span = (to - from).num_days() + 1;
        if span <= 0 {
            return None;
        }
        let hits = dates.range(from..=to).count();
        Some(hits as f64 / span as f64)
    }

    /// Raise or lower the target based on the last week's completion rate.
    pub fn difficulty_adjustment(
        &self,
        habit: &Habit,
        history: &[&HabitCompletion],
        as_of: DateTime<Utc>,
    ) -> Option<AdaptiveSuggestion> {
        if history.len() < self.config.difficulty_min_completions {
            return None;
        }

        let dates = distinct_dates(history.iter().copied(), &self.offset);
        let today = self.today(as_of);
        let rate = Self::day_rate(&dates, today - Duration::days(DIFFICULTY_WINDOW_DAYS - 1), today)?;
        let target = habit.target_value;

        if rate >= self.config.increase_rate && target > 1.0 {
            let to = target + 1.0;
            return Some(AdaptiveSuggestion {
                habit_id: habit.id.clone(),
                suggestion_type: SuggestionType::DifficultyIncrease,
                title: format!("Level up {}", habit.title),
                description: format!(
                    "Raise your target from {target} to {to} {}.",
                    habit.unit
                ),
                rationale: format!(
                    "You hit {} on {:.0}% of the last 7 days.",
                    habit.title,
                    rate * 100.0
                ),
                expected_improvement: 0.15,
                confidence: 0.85,
                implementation: format!("Add one more {} starting tomorrow.", singular(&habit.unit)),
                risks: vec![
                    "A bigger target can break a streak if the week gets busy".to_string(),
                ],
                change: SuggestedChange::Target { from: target, to },
            });
        }

        if rate <= self.config.decrease_rate {
            let to = (target - 1.0).max(1.0);
            if to >= target {
                return None;
            }
            return Some(AdaptiveSuggestion {
                habit_id: habit.id.clone(),
                suggestion_type: SuggestionType::DifficultyDecrease,
                title: format!("Make {} easier", habit.title),
                description: format!(
                    "Lower your target from {target} to {to} {} for now.",
                    habit.unit
                ),
                rationale: format!(
                    "You completed {} on only {:.0}% of the last 7 days.",
                    habit.title,
                    rate * 100.0
                ),
                expected_improvement: 0.25,
                confidence: 0.75,
                implementation: "Go for the smaller goal for two weeks, then reassess.".to_string(),
                risks: vec!["Progress toward the original goal slows temporarily".to_string()],
                change: SuggestedChange::Target { from: target, to },
            });
        }

        None
    }

    /// Move a habit closer to its category's best hour.
    pub fn timing_optimization(
        &self,
        habit: &Habit,
        patterns: &[&HabitPattern],
    ) -> Option<AdaptiveSuggestion> {
        let timing = patterns
            .iter()
            .filter(|p| {
                p.pattern_type == PatternType::Timing
                    && p.strength >= self.config.timing_min_strength
            })
            .max_by(|a, b| a.strength.total_cmp(&b.strength))?;
        let current = timing.mean_hour()?;
        let optimal = optimal_hour(habit.category);

        if clock::distance(current, optimal as f64) <= self.config.timing_tolerance_hours {
            return None;
        }

        let to_label = format_hour(optimal as f64);
        Some(AdaptiveSuggestion {
            habit_id: habit.id.clone(),
            suggestion_type: SuggestionType::TimingOptimization,
            title: format!("Try {} at {}", habit.title, to_label),
            description: format!(
                "You usually do this around {}. {} habits tend to stick best around {}.",
                format_hour(current),
                capitalize(habit.category.label()),
                to_label
            ),
            rationale: timing.insight.clone(),
            expected_improvement: 0.2,
            confidence: timing.strength,
            implementation: format!("Move your reminder for {} to {}.", habit.title, to_label),
            risks: vec![
                "A new time slot can feel unfamiliar and cause misses for a few days".to_string(),
            ],
            change: SuggestedChange::Time {
                from_hour: current,
                to_hour: optimal,
            },
        })
    }

    /// Change frequency when the recent two weeks diverge from the past.
    pub fn frequency_change(
        &self,
        habit: &Habit,
        history: &[&HabitCompletion],
        as_of: DateTime<Utc>,
    ) -> Option<AdaptiveSuggestion> {
        if history.len() < self.config.frequency_min_completions {
            return None;
        }

        let dates = distinct_dates(history.iter().copied(), &self.offset);
        let today = self.today(as_of);
        let recent_start = today - Duration::days(FREQUENCY_RECENT_DAYS - 1);
        let first = *dates.first()?;

        let recent_rate = Self::day_rate(&dates, recent_start, today)?;
        let earlier_rate = Self::day_rate(&dates, first, recent_start - Duration::days(1))?;
        let trend = recent_rate - earlier_rate;
        let threshold = self.config.frequency_trend_threshold;

        let (to, title, expected_improvement, risk) = match habit.frequency {
            HabitFrequency::Weekly if trend > threshold => (
                HabitFrequency::Daily,
                format!("Make {} a daily habit", habit.title),
                0.2,
                "Daily commitment doubles the chances of a missed day",
            ),
            HabitFrequency::Daily if trend < -threshold => (
                HabitFrequency::Weekly,
                format!("Scale {} back to weekly", habit.title),
                0.3,
                "Less frequent practice can weaken the routine",
            ),
            _ => return None,
        };

        Some(AdaptiveSuggestion {
            habit_id: habit.id.clone(),
            suggestion_type: SuggestionType::FrequencyChange,
            title,
            description: format!(
                "Your completion rate moved from {:.0}% to {:.0}% over the last two weeks.",
                earlier_rate * 100.0,
                recent_rate * 100.0
            ),
            rationale: format!("Two-week trend of {:+.0} percentage points.", trend * 100.0),
            expected_improvement,
            confidence: 0.7,
            implementation: "Update the habit's schedule; reminders follow automatically."
                .to_string(),
            risks: vec![risk.to_string()],
            change: SuggestedChange::Frequency {
                from: habit.frequency,
                to,
            },
        })
    }

    /// Pair the habit with one it already co-occurs with.
    pub fn habit_stacking(
        &self,
        habit: &Habit,
        patterns: &[&HabitPattern],
        habits: &[Habit],
    ) -> Option<AdaptiveSuggestion> {
        let best = patterns
            .iter()
            .filter(|p| {
                p.pattern_type == PatternType::Sequential
                    && p.strength >= self.config.stacking_min_strength
            })
            .max_by(|a, b| a.strength.total_cmp(&b.strength))?;
        let PatternDetail::Sequential {
            correlated_habit_id,
            ..
        } = &best.detail
        else {
            return None;
        };

        let anchor_title = habits
            .iter()
            .find(|h| &h.id == correlated_habit_id)
            .map(|h| h.title.as_str())
            .unwrap_or(correlated_habit_id.as_str());

        Some(AdaptiveSuggestion {
            habit_id: habit.id.clone(),
            suggestion_type: SuggestionType::HabitStacking,
            title: format!("Stack {} with {}", habit.title, anchor_title),
            description: best.description.clone(),
            rationale: best.insight.clone(),
            expected_improvement: 0.2,
            confidence: best.strength,
            implementation: best.actionable_advice.clone(),
            risks: vec![format!(
                "Skipping {anchor_title} may now pull {} down with it",
                habit.title
            )],
            change: SuggestedChange::StackAfter {
                habit_id: correlated_habit_id.clone(),
            },
        })
    }
}

/// Sort by score, best first; ties fall back to habit id then type.
pub fn rank(suggestions: &mut [AdaptiveSuggestion]) {
    suggestions.sort_by(|a, b| {
        b.score()
            .total_cmp(&a.score())
            .then_with(|| a.habit_id.cmp(&b.habit_id))
            .then_with(|| a.suggestion_type.cmp(&b.suggestion_type))
    });
}

fn singular(unit: &str) -> &str {
    unit.strip_suffix("es")
        .filter(|s| s.ends_with("ss") || s.ends_with("sh") || s.ends_with("ch"))
        .or_else(|| unit.strip_suffix('s'))
        .unwrap_or(unit)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
