//! Streak record and update rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Persisted streak state for one user.
///
/// Invariant: `longest_streak >= current_streak`, and `total_logs` never
/// decreases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub uid: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Serialized as `yyyy-MM-dd`
    pub last_log_date: Option<NaiveDate>,
    pub streak_start_date: Option<NaiveDate>,
    pub total_logs: u32,
}

impl Streak {
    /// An empty streak that has never been logged.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    /// Whole days between the last log and `today`; `i64::MAX` if never logged.
    ///
    /// A last log dated after `today` (clock or zone skew) counts as today.
    pub fn days_since_last_log(&self, today: NaiveDate) -> i64 {
        match self.last_log_date {
            Some(last) => (today - last).num_days().max(0),
            None => i64::MAX,
        }
    }

    /// A streak is alive if it was logged today or yesterday.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.days_since_last_log(today) <= 1
    }

    /// Short status line for the current count.
    pub fn status_message(&self) -> String {
        match self.current_streak {
            0 => "Log something today to start a streak".to_string(),
            1 => "1 day in a row. Great start!".to_string(),
            n @ 2..=6 => format!("{n} days in a row"),
            n => format!("🔥 {n} day streak!"),
        }
    }
}

/// What an update did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First ever log
    Started,
    /// Logged the day after the previous log
    Extended,
    /// Logged again on the same calendar day
    SameDay,
    /// A gap of two or more days restarted the count
    Reset,
    /// Date precedes the last log; the streak was left untouched
    OutOfOrder,
}

/// Result of applying one log date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: Streak,
    pub change: StreakChange,
}

/// Applies log dates to a [`Streak`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator;

impl StreakCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Apply a new log on `date` (the caller's local calendar date).
    pub fn apply(&self, streak: &Streak, date: NaiveDate) -> StreakUpdate {
        let mut next = streak.clone();

        let Some(last) = streak.last_log_date else {
            next.current_streak = 1;
            next.longest_streak = next.longest_streak.max(1);
            next.streak_start_date = Some(date);
            next.last_log_date = Some(date);
            next.total_logs = next.total_logs.saturating_add(1);
            return StreakUpdate {
                streak: next,
                change: StreakChange::Started,
            };
        };

        let gap_days = (date - last).num_days();
        let change = match gap_days {
            g if g < 0 => {
                tracing::debug!(
                    uid = %streak.uid,
                    %date,
                    last_log_date = %last,
                    "ignoring out-of-order streak log"
                );
                StreakChange::OutOfOrder
            }
            0 => StreakChange::SameDay,
            1 => {
                next.current_streak = next.current_streak.saturating_add(1);
                next.longest_streak = next.longest_streak.max(next.current_streak);
                next.total_logs = next.total_logs.saturating_add(1);
                next.last_log_date = Some(date);
                if next.streak_start_date.is_none() {
                    next.streak_start_date = Some(last);
                }
                StreakChange::Extended
            }
            _ => {
                next.current_streak = 1;
                next.longest_streak = next.longest_streak.max(1);
                next.streak_start_date = Some(date);
                next.total_logs = next.total_logs.saturating_add(1);
                next.last_log_date = Some(date);
                StreakChange::Reset
            }
        };

        StreakUpdate {
            streak: next,
            change,
        }
    }

    /// Parse a `yyyy-MM-dd` date and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] if `date` is not a calendar date.
    pub fn calculate_updated_streak(
        &self,
        streak: &Streak,
        date: &str,
    ) -> Result<StreakUpdate, ValidationError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidDate {
                value: date.to_string(),
            }
        })?;
        Ok(self.apply(streak, parsed))
    }

    /// Rebuild a streak from a full history of log dates.
    ///
    /// Dates are sorted and de-duplicated first, so order in the input does
    /// not matter.
    pub fn rebuild_from_dates<I>(&self, uid: impl Into<String>, dates: I) -> Streak
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut sorted: Vec<NaiveDate> = dates.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        sorted
            .into_iter()
            .fold(Streak::new(uid), |acc, date| self.apply(&acc, date).streak)
    }
}
