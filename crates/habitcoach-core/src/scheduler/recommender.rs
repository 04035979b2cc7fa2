//! Per-habit time-of-day recommendations.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::{is_outdoor, EnvironmentalContext};
use crate::energy::{CircadianAnalyzer, CircadianProfile};
use crate::habit::{Habit, HabitCategory};
use crate::health::HealthLog;

/// Sleep defaults and look-back for the circadian profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// `HH:MM`, used when no sleep logs exist
    #[serde(default = "default_bed_time")]
    pub default_bed_time: String,
    #[serde(default = "default_wake_time")]
    pub default_wake_time: String,
    #[serde(default = "default_sleep_hours")]
    pub default_sleep_hours: f64,
    #[serde(default = "default_sleep_lookback_days")]
    pub sleep_lookback_days: i64,
    /// Capped at 3
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
}

fn default_bed_time() -> String {
    "22:30".to_string()
}
fn default_wake_time() -> String {
    "07:00".to_string()
}
fn default_sleep_hours() -> f64 {
    8.0
}
fn default_sleep_lookback_days() -> i64 {
    30
}
fn default_max_alternatives() -> usize {
    3
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_bed_time: default_bed_time(),
            default_wake_time: default_wake_time(),
            default_sleep_hours: default_sleep_hours(),
            sleep_lookback_days: default_sleep_lookback_days(),
            max_alternatives: default_max_alternatives(),
        }
    }
}

/// Energy at or above which an hour counts as a good alternative.
const ALTERNATIVE_MIN_ENERGY: f64 = 0.6;
/// Focus habits need strictly more energy than this.
const FOCUS_MIN_ENERGY: f64 = 0.6;

/// Suggested hour for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitScheduleRecommendation {
    pub habit_id: String,
    pub habit_title: String,
    pub recommended_time: NaiveTime,
    /// At most three other high-energy hours
    pub alternative_times: Vec<NaiveTime>,
    /// 0.1-0.95
    pub success_probability: f64,
    /// Profile energy at the recommended hour
    pub energy_level: f64,
    pub reasoning: Vec<String>,
}

/// Chosen hour and whether it came from the category's preferred band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    hour: u32,
    in_band: bool,
}

#[derive(Debug, Clone)]
pub struct ScheduleRecommender {
    config: ScheduleConfig,
    analyzer: CircadianAnalyzer,
}

impl ScheduleRecommender {
    pub fn new(offset: FixedOffset) -> Self {
        Self::with_config(ScheduleConfig::default(), offset)
    }

    pub fn with_config(config: ScheduleConfig, offset: FixedOffset) -> Self {
        Self {
            analyzer: CircadianAnalyzer::new(config.clone(), offset),
            config,
        }
    }

    pub fn analyzer(&self) -> &CircadianAnalyzer {
        &self.analyzer
    }

    /// Build the profile from `health_logs` and recommend every active habit.
    pub fn recommend(
        &self,
        habits: &[Habit],
        health_logs: &[HealthLog],
        context: Option<&EnvironmentalContext>,
        as_of: DateTime<Utc>,
    ) -> Vec<HabitScheduleRecommendation> {
        let profile = self.analyzer.compute_profile(health_logs, as_of);
        self.recommend_with_profile(habits, &profile, context)
    }

    /// Recommendations for active habits, most likely to succeed first.
    pub fn recommend_with_profile(
        &self,
        habits: &[Habit],
        profile: &CircadianProfile,
        context: Option<&EnvironmentalContext>,
    ) -> Vec<HabitScheduleRecommendation> {
        let mut recommendations: Vec<_> = habits
            .iter()
            .filter(|h| h.is_active)
            .map(|h| self.recommend_habit(h, profile, context))
            .collect();

        recommendations.sort_by(|a, b| {
            b.success_probability
                .total_cmp(&a.success_probability)
                .then_with(|| a.habit_id.cmp(&b.habit_id))
        });
        recommendations
    }

    pub fn recommend_habit(
        &self,
        habit: &Habit,
        profile: &CircadianProfile,
        context: Option<&EnvironmentalContext>,
    ) -> HabitScheduleRecommendation {
        let slot = Self::find_optimal_time(habit, profile);
        let energy = profile.get_energy(slot.hour);
        let outdoor_bonus = is_outdoor(habit) && context.is_some_and(|c| c.is_good_for_outdoors());

        let mut probability = 0.5
            + (energy - 0.5) * 0.3
            + (profile.rhythm_strength - 0.5) * 0.2;
        if slot.in_band {
            probability += 0.1;
        }
        if outdoor_bonus {
            probability += 0.05;
        }
        let success_probability = probability.clamp(0.1, 0.95);

        let mut reasoning = Vec::new();
        let level = if energy >= 0.7 { "high" } else if energy >= 0.5 { "moderate" } else { "low" };
        reasoning.push(format!(
            "Energy is {level} at {:02}:00 ({:.0}%)",
            slot.hour,
            energy * 100.0
        ));
        if slot.in_band {
            reasoning.push(format!(
                "{:02}:00 fits the usual window for {} habits",
                slot.hour,
                habit.category.label()
            ));
        }
        if profile.rhythm_strength >= 0.6 {
            reasoning.push("Your daily rhythm is regular".to_string());
        }
        if outdoor_bonus {
            reasoning.push("Good weather for being outside".to_string());
        }
        if profile.sleep.sample_count == 0 {
            reasoning.push("Based on a typical sleep schedule; log sleep to personalize".to_string());
        }

        tracing::trace!(
            habit_id = %habit.id,
            hour = slot.hour,
            in_band = slot.in_band,
            success_probability,
            "scheduled habit"
        );

        HabitScheduleRecommendation {
            habit_id: habit.id.clone(),
            habit_title: habit.title.clone(),
            recommended_time: on_the_hour(slot.hour),
            alternative_times: self.alternatives(profile, slot.hour),
            success_probability,
            energy_level: energy,
            reasoning,
        }
    }

    fn find_optimal_time(habit: &Habit, profile: &CircadianProfile) -> Slot {
        let peak = Slot { hour: profile.peak_hour(), in_band: false };
        let banded = |hour: Option<u32>| hour.map_or(peak, |hour| Slot { hour, in_band: true });

        match habit.category {
            HabitCategory::Fitness | HabitCategory::Health => banded(profile.best_hour_in(6..=10)),
            HabitCategory::MentalHealth | HabitCategory::Learning => banded(
                profile.best_hour_in((9..=14).filter(|h| profile.get_energy(*h) > FOCUS_MIN_ENERGY)),
            ),
            HabitCategory::Nutrition => match meal_hour(&habit.title) {
                Some(hour) => Slot { hour, in_band: true },
                None => Slot { hour: 12, in_band: false },
            },
            HabitCategory::Sleep => Slot { hour: 21, in_band: true },
            _ => peak,
        }
    }

    fn alternatives(&self, profile: &CircadianProfile, chosen: u32) -> Vec<NaiveTime> {
        let mut hours: Vec<u32> = profile
            .get_recommended_hours(ALTERNATIVE_MIN_ENERGY)
            .into_iter()
            .filter(|h| *h != chosen)
            .collect();
        hours.sort_by(|a, b| {
            profile
                .get_energy(*b)
                .total_cmp(&profile.get_energy(*a))
                .then_with(|| a.cmp(b))
        });
        hours
            .into_iter()
            .take(self.config.max_alternatives.min(3))
            .map(on_the_hour)
            .collect()
    }
}

fn meal_hour(title: &str) -> Option<u32> {
    let title = title.to_lowercase();
    [
        ("breakfast", 8),
        ("lunch", 12),
        ("dinner", 18),
        ("supper", 18),
        ("snack", 15),
    ]
    .iter()
    .find(|(meal, _)| title.contains(meal))
    .map(|(_, hour)| *hour)
}

fn on_the_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour % 24, 0, 0).unwrap_or(NaiveTime::MIN)
}
