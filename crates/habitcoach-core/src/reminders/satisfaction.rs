//! "Is this reminder's goal already met today?"

use chrono::{DateTime, Duration, Utc};

use super::types::{Reminder, ReminderAction};
use crate::habit::Habit;
use crate::snapshot::DaySnapshot;

/// Pure predicate over a [`DaySnapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatisfactionChecker {
    ml_per_glass: f64,
    fallback_water_glasses: f64,
}

impl Default for SatisfactionChecker {
    fn default() -> Self {
        Self::new(240.0, 8.0)
    }
}

impl SatisfactionChecker {
    pub fn new(ml_per_glass: f64, fallback_water_glasses: f64) -> Self {
        Self { ml_per_glass, fallback_water_glasses }
    }

    /// The habit's daily target converted to millilitres.
    ///
    /// Unknown units are read as glasses.
    pub fn habit_target_ml(&self, habit: &Habit) -> f64 {
        let unit = habit.unit.trim().to_lowercase();
        match unit.as_str() {
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => habit.target_value,
            "l" | "liter" | "liters" | "litre" | "litres" => habit.target_value * 1000.0,
            _ => habit.target_value * self.ml_per_glass,
        }
    }

    /// Water target for a reminder: its linked habit if it resolves,
    /// else the fallback glass count.
    pub fn water_target_ml(&self, reminder: &Reminder, snapshot: &DaySnapshot) -> f64 {
        reminder
            .habit_id()
            .and_then(|id| snapshot.habit(id))
            .map(|h| self.habit_target_ml(h))
            .unwrap_or(self.fallback_water_glasses * self.ml_per_glass)
    }

    fn water_met(&self, target_ml: f64, snapshot: &DaySnapshot) -> bool {
        snapshot.water_total_ml() >= target_ml
    }

    pub fn is_satisfied(&self, reminder: &Reminder, snapshot: &DaySnapshot, now: DateTime<Utc>) -> bool {
        if let Some(kind) = reminder.action.log_kind() {
            return snapshot.has_log(kind);
        }

        match reminder.action {
            ReminderAction::LogWater => self.water_met(self.water_target_ml(reminder, snapshot), snapshot),
            ReminderAction::StartJournal => snapshot.journal_completed(),
            ReminderAction::StartMindfulness => snapshot.mindfulness.as_ref().is_some_and(|m| {
                m.played_count > 0
                    && m
                        .last_played_at
                        .is_some_and(|at| at <= now && now - at <= Duration::hours(24))
            }),
            ReminderAction::CompleteHabit => {
                let Some(habit_id) = reminder.habit_id() else {
                    return false;
                };
                if snapshot.habit_completed(habit_id) {
                    return true;
                }
                snapshot
                    .habit(habit_id)
                    .filter(|h| h.is_hydration())
                    .is_some_and(|h| self.water_met(self.habit_target_ml(h), snapshot))
            }
            _ => false,
        }
    }
}
