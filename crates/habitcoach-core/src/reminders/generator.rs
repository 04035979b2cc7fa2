//! Candidate reminder generation.

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use super::types::{Reminder, ReminderAction, ReminderCategory, ReminderPriority};
use crate::snapshot::DaySnapshot;

/// Produces the ordered candidate list for a day.
///
/// Ids must be stable for the same day so that dismissals recorded by the
/// queue keep matching after regeneration.
pub trait ReminderGenerator: Send + Sync {
    fn generate(&self, snapshot: &DaySnapshot, now: DateTime<Utc>) -> Vec<Reminder>;
}

/// Habit reminders plus health prompts chosen by the local hour.
#[derive(Debug, Clone, Copy)]
pub struct StandardReminderGenerator {
    offset: FixedOffset,
}

impl StandardReminderGenerator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl ReminderGenerator for StandardReminderGenerator {
    fn generate(&self, snapshot: &DaySnapshot, now: DateTime<Utc>) -> Vec<Reminder> {
        let date = snapshot.date;
        let hour = now.with_timezone(&self.offset).hour();
        let id = |kind: &str| format!("{date}:{kind}");
        let mut reminders = Vec::new();

        for habit in snapshot.active_habits() {
            reminders.push(
                Reminder::new(
                    id(&format!("habit:{}", habit.id)),
                    ReminderAction::CompleteHabit,
                    format!("Complete {}", habit.title),
                    format!("{} {} today", fmt_amount(habit.target_value), habit.unit),
                )
                .with_priority(ReminderPriority::High)
                .with_category(ReminderCategory::Habit)
                .with_icon(habit.category.label())
                .with_habit(habit.id.clone()),
            );
        }

        if (6..=11).contains(&hour) {
            reminders.push(
                Reminder::new(id("sleep"), ReminderAction::LogSleep, "Log last night's sleep", "How did you sleep?")
                    .with_category(ReminderCategory::Sleep),
            );
        }
        if (6..=10).contains(&hour) {
            reminders.push(
                Reminder::new(id("meal:breakfast"), ReminderAction::LogMeal, "Log breakfast", "What did you eat this morning?")
                    .with_category(ReminderCategory::Nutrition),
            );
            reminders.push(
                Reminder::new(id("weight"), ReminderAction::LogWeight, "Morning weigh-in", "Log your weight before breakfast")
                    .with_priority(ReminderPriority::Low)
                    .with_category(ReminderCategory::Fitness),
            );
        }
        if (7..=10).contains(&hour) {
            reminders.push(
                Reminder::new(id("supplement"), ReminderAction::LogSupplement, "Supplements", "Log any supplements you took")
                    .with_priority(ReminderPriority::Low)
                    .with_category(ReminderCategory::Nutrition),
            );
        }
        if (8..=21).contains(&hour) {
            let mut water = Reminder::new(id("water"), ReminderAction::LogWater, "Stay hydrated", "Log a glass of water")
                .with_priority(ReminderPriority::High)
                .with_category(ReminderCategory::Hydration)
                .with_icon("water")
                .with_estimate(1);
            if let Some(habit) = snapshot.active_habits().find(|h| h.is_hydration()) {
                water = water.with_habit(habit.id.clone());
            }
            reminders.push(water);
        }
        if (11..=14).contains(&hour) {
            reminders.push(
                Reminder::new(id("meal:lunch"), ReminderAction::LogMeal, "Log lunch", "Keep your food log current")
                    .with_category(ReminderCategory::Nutrition),
            );
        }
        if (13..=23).contains(&hour) {
            reminders.push(
                Reminder::new(id("mindfulness"), ReminderAction::StartMindfulness, "Take a mindful pause", "A few minutes of breathing")
                    .with_category(ReminderCategory::Wellness)
                    .with_icon("mindfulness")
                    .with_estimate(5),
            );
        }
        if (15..=20).contains(&hour) {
            reminders.push(
                Reminder::new(id("workout"), ReminderAction::LogWorkout, "Time to move", "Log today's workout")
                    .with_category(ReminderCategory::Fitness),
            );
        }
        if (17..=21).contains(&hour) {
            reminders.push(
                Reminder::new(id("meal:dinner"), ReminderAction::LogMeal, "Log dinner", "What's for dinner?")
                    .with_category(ReminderCategory::Nutrition),
            );
        }
        if (19..=23).contains(&hour) {
            reminders.push(
                Reminder::new(id("journal"), ReminderAction::StartJournal, "Evening journal", "Reflect on your day")
                    .with_category(ReminderCategory::Wellness)
                    .with_icon("journal")
                    .with_estimate(10),
            );
        }

        tracing::debug!(
            user_id = %snapshot.user_id,
            %date,
            hour,
            candidates = reminders.len(),
            "generated reminder candidates"
        );
        reminders
    }
}

fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
