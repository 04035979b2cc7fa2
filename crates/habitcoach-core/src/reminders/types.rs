//! Reminder records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::health::HealthLogKind;

/// `action_data` key linking a reminder to a habit.
pub const HABIT_ID_KEY: &str = "habitId";

/// What a reminder asks the user to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderAction {
    LogMeal,
    LogWater,
    LogWeight,
    LogSleep,
    LogWorkout,
    LogSupplement,
    StartJournal,
    StartMindfulness,
    CompleteHabit,
    ViewHealthTracking,
    ViewWellness,
    ViewHabits,
    ViewProgress,
    ViewInsights,
    ViewWellnessTip,
}

impl ReminderAction {
    /// Health log type whose presence today satisfies the reminder.
    pub fn log_kind(&self) -> Option<HealthLogKind> {
        match self {
            ReminderAction::LogMeal => Some(HealthLogKind::Meal),
            ReminderAction::LogWeight => Some(HealthLogKind::Weight),
            ReminderAction::LogSleep => Some(HealthLogKind::Sleep),
            ReminderAction::LogWorkout => Some(HealthLogKind::Workout),
            ReminderAction::LogSupplement => Some(HealthLogKind::Supplement),
            _ => None,
        }
    }

    /// Navigation prompts. Never satisfied automatically.
    pub fn is_view(&self) -> bool {
        matches!(
            self,
            ReminderAction::ViewHealthTracking
                | ReminderAction::ViewWellness
                | ReminderAction::ViewHabits
                | ReminderAction::ViewProgress
                | ReminderAction::ViewInsights
                | ReminderAction::ViewWellnessTip
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderCategory {
    Habit,
    Hydration,
    Nutrition,
    Fitness,
    Sleep,
    Wellness,
    General,
}

/// A single prompt in the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Stable for the day so dismissals survive regeneration
    pub id: String,
    pub title: String,
    pub description: String,
    /// Icon name for the UI
    #[serde(default)]
    pub icon: Option<String>,
    pub action: ReminderAction,
    pub priority: ReminderPriority,
    pub category: ReminderCategory,
    #[serde(default)]
    pub action_data: BTreeMap<String, String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

impl Reminder {
    pub fn new(
        id: impl Into<String>,
        action: ReminderAction,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            icon: None,
            action,
            priority: ReminderPriority::Medium,
            category: ReminderCategory::General,
            action_data: BTreeMap::new(),
            estimated_minutes: None,
        }
    }

    pub fn with_priority(mut self, priority: ReminderPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: ReminderCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_habit(mut self, habit_id: impl Into<String>) -> Self {
        self.action_data.insert(HABIT_ID_KEY.to_string(), habit_id.into());
        self
    }

    pub fn habit_id(&self) -> Option<&str> {
        self.action_data.get(HABIT_ID_KEY).map(String::as_str)
    }
}

/// Why a reminder left the queue. Both are terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dismissal {
    Completed,
    Skipped,
}
