//! Point-in-time view of one user's day.
//!
//! The reminder engine never reads storage itself. A [`SnapshotSource`]
//! collaborator assembles a [`DaySnapshot`] and the engine works on that.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::habit::{Habit, HabitCompletion};
use crate::health::{DailyLog, HealthEntry, HealthLog, HealthLogKind, MindfulnessSession};

/// Everything known about `date` for one user.
///
/// `completions_today` and `health_logs` are expected to be already
/// restricted to `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub user_id: String,
    pub date: NaiveDate,
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub completions_today: Vec<HabitCompletion>,
    #[serde(default)]
    pub health_logs: Vec<HealthLog>,
    #[serde(default)]
    pub daily_log: Option<DailyLog>,
    #[serde(default)]
    pub mindfulness: Option<MindfulnessSession>,
}

impl DaySnapshot {
    /// An empty day with no habits or logs.
    pub fn empty(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            habits: Vec::new(),
            completions_today: Vec::new(),
            health_logs: Vec::new(),
            daily_log: None,
            mindfulness: None,
        }
    }

    pub fn active_habits(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|h| h.is_active)
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub fn has_log(&self, kind: HealthLogKind) -> bool {
        self.health_logs.iter().any(|l| l.kind() == kind)
    }

    pub fn habit_completed(&self, habit_id: &str) -> bool {
        self.completions_today.iter().any(|c| c.habit_id == habit_id)
    }

    pub fn journal_completed(&self) -> bool {
        self.health_logs
            .iter()
            .any(|l| matches!(l.entry, HealthEntry::Journal { completed: true }))
    }

    /// Daily running total plus today's individual water logs, in ml.
    pub fn water_total_ml(&self) -> f64 {
        let running = self.daily_log.as_ref().map_or(0.0, |d| d.water_ml);
        let logged: f64 = self
            .health_logs
            .iter()
            .filter_map(|l| match l.entry {
                HealthEntry::Water { amount_ml } if amount_ml.is_finite() => Some(amount_ml),
                _ => None,
            })
            .sum();
        running + logged
    }
}

/// Read-only port that assembles a [`DaySnapshot`].
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self, user_id: &str, date: NaiveDate) -> Result<DaySnapshot, SnapshotError>;
}
