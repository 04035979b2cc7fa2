//! Filtering, floor padding and refresh for the reminder queue.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use super::generator::ReminderGenerator;
use super::queue::{DayChange, ReminderQueue};
use super::satisfaction::SatisfactionChecker;
use super::types::{Reminder, ReminderAction, ReminderCategory, ReminderPriority};
use crate::error::RefreshError;
use crate::snapshot::{DaySnapshot, SnapshotSource};

/// Reminder queue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Minimum number of reminders shown after filtering
    #[serde(default = "default_floor_size")]
    pub floor_size: usize,
    #[serde(default = "default_ml_per_glass")]
    pub ml_per_glass: f64,
    /// Water target when a reminder has no linked habit
    #[serde(default = "default_fallback_water_glasses")]
    pub fallback_water_glasses: f64,
    /// Wait after a write before re-reading an eventually consistent store
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_floor_size() -> usize {
    7
}
fn default_ml_per_glass() -> f64 {
    240.0
}
fn default_fallback_water_glasses() -> f64 {
    8.0
}
fn default_settle_delay_ms() -> u64 {
    1500
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            floor_size: default_floor_size(),
            ml_per_glass: default_ml_per_glass(),
            fallback_water_glasses: default_fallback_water_glasses(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Named fallbacks, tried in order.
const FALLBACKS: [(ReminderAction, &str, &str, &str); 9] = [
    (ReminderAction::ViewHealthTracking, "health-tracking", "Check your health log", "See today's meals, water and sleep"),
    (ReminderAction::ViewWellness, "wellness", "Wellness check-in", "How are you feeling today?"),
    (ReminderAction::ViewHabits, "habits", "Review your habits", "See what's left for today"),
    (ReminderAction::LogMeal, "meal", "Log a meal", "Keep your food log current"),
    (ReminderAction::LogWater, "water", "Drink some water", "Log a glass of water"),
    (ReminderAction::LogWorkout, "workout", "Move your body", "Log any activity from today"),
    (ReminderAction::StartJournal, "journal", "Write in your journal", "A few lines about your day"),
    (ReminderAction::ViewProgress, "progress", "See your progress", "Look back at your streaks"),
    (ReminderAction::ViewInsights, "insights", "Your insights", "Patterns found in your habits"),
];

/// Wellness tips used after the named fallbacks run out.
const WELLNESS_TIPS: [(&str, &str, &str); 8] = [
    ("stretch", "Stretch break", "Stand up and stretch for two minutes"),
    ("breathe", "Breathe", "Take five slow, deep breaths"),
    ("posture", "Check your posture", "Relax your shoulders and sit tall"),
    ("eyes", "Rest your eyes", "Look at something far away for 20 seconds"),
    ("outside", "Step outside", "A few minutes of daylight helps your rhythm"),
    ("gratitude", "Gratitude", "Name one thing that went well today"),
    ("screens", "Screen break", "Put your phone down for ten minutes"),
    ("bedtime", "Plan your bedtime", "Aim for the same time as yesterday"),
];

/// Owns one user's reminder session.
pub struct ReminderQueueEngine<G> {
    user_id: String,
    generator: G,
    checker: SatisfactionChecker,
    config: ReminderConfig,
    offset: FixedOffset,
    queue: ReminderQueue,
}

impl<G: ReminderGenerator> ReminderQueueEngine<G> {
    pub fn new(user_id: impl Into<String>, generator: G, offset: FixedOffset) -> Self {
        Self::with_config(user_id, generator, ReminderConfig::default(), offset)
    }

    pub fn with_config(
        user_id: impl Into<String>,
        generator: G,
        config: ReminderConfig,
        offset: FixedOffset,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            generator,
            checker: SatisfactionChecker::new(config.ml_per_glass, config.fallback_water_glasses),
            config,
            offset,
            queue: ReminderQueue::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn queue(&self) -> &ReminderQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut ReminderQueue {
        &mut self.queue
    }

    pub fn checker(&self) -> &SatisfactionChecker {
        &self.checker
    }

    pub fn current(&self) -> Option<&Reminder> {
        self.queue.current()
    }

    pub fn complete_current(&mut self) -> Option<Reminder> {
        self.queue.complete_current()
    }

    pub fn skip_current(&mut self) -> Option<Reminder> {
        self.queue.skip_current()
    }

    /// Local calendar date of `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Regenerate, filter and pad against `snapshot`, then commit.
    ///
    /// Returns the new active count. A snapshot older than the session day
    /// is ignored.
    pub fn refresh(&mut self, snapshot: &DaySnapshot, now: DateTime<Utc>) -> usize {
        if self.queue.begin_day(snapshot.date) == DayChange::Stale {
            tracing::warn!(
                user_id = %self.user_id,
                snapshot_date = %snapshot.date,
                session_date = ?self.queue.date(),
                "ignoring stale reminder snapshot"
            );
            return self.queue.len();
        }
        let active = self.build_active(snapshot, now);
        self.queue.replace(active);
        self.queue.len()
    }

    /// Fetch today's snapshot and refresh.
    ///
    /// Nothing is touched until the fetch has succeeded, so a failed or
    /// dropped fetch leaves the previous queue in place.
    pub async fn refresh_from<S>(&mut self, source: &S, now: DateTime<Utc>) -> Result<usize, RefreshError>
    where
        S: SnapshotSource + ?Sized,
    {
        let date = self.today(now);
        let snapshot = match source.fetch_snapshot(&self.user_id, date).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    user_id = %self.user_id,
                    %date,
                    error = %e,
                    kept = self.queue.len(),
                    "reminder refresh failed"
                );
                return Err(e.into());
            }
        };
        Ok(self.refresh(&snapshot, now))
    }

    /// Wait out the store's settle delay after a write, then refresh.
    pub async fn refresh_after_write<S>(&mut self, source: &S, now: DateTime<Utc>) -> Result<usize, RefreshError>
    where
        S: SnapshotSource + ?Sized,
    {
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        self.refresh_from(source, now).await
    }

    /// Complete the current reminder if it is `reminder_id` and its goal is
    /// now met in `snapshot`.
    pub fn check_and_advance_if_completed(
        &mut self,
        reminder_id: &str,
        snapshot: &DaySnapshot,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(current) = self.queue.current() else {
            return false;
        };
        if current.id != reminder_id || !self.checker.is_satisfied(current, snapshot, now) {
            return false;
        }
        self.queue.complete_current().is_some()
    }

    /// Candidates minus dismissed and satisfied ones, padded to the floor.
    pub fn build_active(&self, snapshot: &DaySnapshot, now: DateTime<Utc>) -> Vec<Reminder> {
        let candidates = self.generator.generate(snapshot, now);
        let generated = candidates.len();
        let original_actions: HashSet<ReminderAction> = candidates.iter().map(|r| r.action).collect();

        let mut seen = HashSet::new();
        let mut active: Vec<Reminder> = candidates
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .filter(|r| !self.queue.is_dismissed(&r.id))
            .filter(|r| !self.checker.is_satisfied(r, snapshot, now))
            .collect();
        let filtered = active.len();

        self.pad(&mut active, &original_actions, snapshot, now);

        tracing::debug!(
            user_id = %self.user_id,
            generated,
            filtered,
            padded = active.len() - filtered,
            "built reminder list"
        );
        active
    }

    fn pad(
        &self,
        active: &mut Vec<Reminder>,
        original_actions: &HashSet<ReminderAction>,
        snapshot: &DaySnapshot,
        now: DateTime<Utc>,
    ) {
        let floor = self.config.floor_size;
        let date = snapshot.date;
        // Dismissed this session counts as present so fallbacks don't re-prompt it
        let mut present: HashSet<ReminderAction> = active
            .iter()
            .map(|r| r.action)
            .chain(self.queue.dismissed_actions().iter().copied())
            .collect();

        for (action, slug, title, description) in FALLBACKS {
            if active.len() >= floor {
                return;
            }
            if present.contains(&action) {
                continue;
            }
            let reminder = Reminder::new(format!("{date}:fallback:{slug}"), action, title, description)
                .with_priority(ReminderPriority::Low)
                .with_category(ReminderCategory::General);
            if self.queue.is_dismissed(&reminder.id) || self.checker.is_satisfied(&reminder, snapshot, now) {
                continue;
            }
            present.insert(action);
            active.push(reminder);
        }

        if original_actions.contains(&ReminderAction::ViewWellnessTip) {
            return;
        }
        for (slug, title, description) in WELLNESS_TIPS {
            if active.len() >= floor {
                return;
            }
            let id = format!("{date}:tip:{slug}");
            if self.queue.is_dismissed(&id) || active.iter().any(|r| r.id == id) {
                continue;
            }
            active.push(
                Reminder::new(id, ReminderAction::ViewWellnessTip, title, description)
                    .with_priority(ReminderPriority::Low)
                    .with_category(ReminderCategory::Wellness)
                    .with_estimate(2),
            );
        }

        if active.len() < floor {
            tracing::debug!(
                user_id = %self.user_id,
                len = active.len(),
                floor,
                "reminder floor not reachable"
            );
        }
    }
}
