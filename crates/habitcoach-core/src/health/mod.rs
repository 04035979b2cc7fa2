//! Daily aggregate and typed health log records.
//!
//! These mirror what the tracking screens write. The engines only read
//! them: the reminder filter checks them for today's goals and the
//! schedule recommender averages sleep entries.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-day aggregate written alongside the individual logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    /// Running water total in millilitres
    #[serde(default)]
    pub water_ml: f64,
    #[serde(default)]
    pub calories_burned: f64,
    #[serde(default)]
    pub steps: u32,
    /// Self-reported mood 1-10
    #[serde(default)]
    pub mood: Option<u8>,
    /// Self-reported stress 1-10
    #[serde(default)]
    pub stress: Option<u8>,
}

/// A night of sleep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    /// Bed time, `HH:MM` local
    pub bed_time: String,
    /// Wake time, `HH:MM` local
    pub wake_time: String,
    pub duration_hours: f64,
    /// Quality score 1-10
    pub quality: u8,
}

impl SleepLog {
    fn parse_clock(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
    }

    pub fn bed_time(&self) -> Option<NaiveTime> {
        Self::parse_clock(&self.bed_time)
    }

    pub fn wake_time(&self) -> Option<NaiveTime> {
        Self::parse_clock(&self.wake_time)
    }
}

/// Discriminant of a [`HealthEntry`], used for "logged today?" checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLogKind {
    Meal,
    Water,
    Weight,
    Sleep,
    Workout,
    Supplement,
    Journal,
    Mindfulness,
}

/// Payload of a health log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthEntry {
    Meal { description: String, calories: Option<f64> },
    Water { amount_ml: f64 },
    Weight { kg: f64 },
    Sleep(SleepLog),
    Workout { activity: String, minutes: u32 },
    Supplement { name: String },
    Journal { completed: bool },
    Mindfulness { minutes: u32 },
}

impl HealthEntry {
    pub fn kind(&self) -> HealthLogKind {
        match self {
            HealthEntry::Meal { .. } => HealthLogKind::Meal,
            HealthEntry::Water { .. } => HealthLogKind::Water,
            HealthEntry::Weight { .. } => HealthLogKind::Weight,
            HealthEntry::Sleep(_) => HealthLogKind::Sleep,
            HealthEntry::Workout { .. } => HealthLogKind::Workout,
            HealthEntry::Supplement { .. } => HealthLogKind::Supplement,
            HealthEntry::Journal { .. } => HealthLogKind::Journal,
            HealthEntry::Mindfulness { .. } => HealthLogKind::Mindfulness,
        }
    }
}

/// A typed health log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLog {
    pub id: String,
    pub logged_at: DateTime<Utc>,
    pub entry: HealthEntry,
}

impl HealthLog {
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.logged_at.with_timezone(offset).date_naive()
    }

    pub fn kind(&self) -> HealthLogKind {
        self.entry.kind()
    }
}

/// The day's guided mindfulness session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessSession {
    pub played_count: u32,
    #[serde(default)]
    pub last_played_at: Option<DateTime<Utc>>,
}
