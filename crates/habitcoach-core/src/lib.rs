//! # HabitCoach Core Library
//!
//! Behavioral analytics for a personal habit tracker. Every engine is a
//! synchronous computation over data the caller has already loaded; the
//! only async surface is the reminder refresh, which reads through a
//! [`SnapshotSource`] port.
//!
//! ## Architecture
//!
//! - **Streaks**: consecutive-day logging counts with out-of-order logs ignored
//! - **Patterns**: threshold-gated detectors over one habit's completions
//! - **Suggestions**: rule-based, ranked changes to a habit
//! - **Scheduling**: circadian energy profile and per-habit time slots
//! - **Reminders**: filtered, floor-padded daily queue with a cursor
//!
//! All calendar math uses the caller's [`chrono::FixedOffset`].
//!
//! ## Key Components
//!
//! - [`StreakCalculator`]: Streak transitions
//! - [`PatternMiner`]: Behavioral patterns
//! - [`SuggestionEngine`]: Adaptive suggestions
//! - [`ScheduleRecommender`]: Time-of-day recommendations
//! - [`ReminderQueueEngine`]: Reminder session state machine
//! - [`EngineConfig`]: TOML configuration for all of the above

pub mod config;
pub mod energy;
pub mod error;
pub mod habit;
pub mod health;
pub mod logging;
pub mod patterns;
pub mod reminders;
pub mod scheduler;
pub mod snapshot;
pub mod streak;
pub mod suggestions;

pub use config::EngineConfig;
pub use energy::{CircadianAnalyzer, CircadianProfile};
pub use error::{ConfigError, CoreError, RefreshError, SnapshotError, ValidationError};
pub use habit::{Habit, HabitCategory, HabitCompletion, HabitFrequency};
pub use health::{DailyLog, HealthEntry, HealthLog, HealthLogKind, MindfulnessSession, SleepLog};
pub use patterns::{AnalysisWindow, HabitPattern, MiningInput, PatternMiner, PatternType};
pub use reminders::{
    Reminder, ReminderAction, ReminderGenerator, ReminderQueue, ReminderQueueEngine,
    SatisfactionChecker, StandardReminderGenerator,
};
pub use scheduler::{EnvironmentalContext, HabitScheduleRecommendation, ScheduleRecommender, Weather};
pub use snapshot::{DaySnapshot, SnapshotSource};
pub use streak::{Streak, StreakCalculator, StreakChange, StreakUpdate};
pub use suggestions::{AdaptiveSuggestion, SuggestionEngine, SuggestionInput, SuggestionType};
