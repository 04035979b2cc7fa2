//! Session reminder queue with a cursor.
//!
//! The dismissed map only grows within a session. It is cleared on day
//! rollover or an explicit [`ReminderQueue::reset_session`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::types::{Dismissal, Reminder, ReminderAction};
use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderQueue {
    session_id: Uuid,
    date: Option<NaiveDate>,
    active: Vec<Reminder>,
    cursor: Option<usize>,
    dismissed: BTreeMap<String, Dismissal>,
    #[serde(default)]
    dismissed_actions: BTreeSet<ReminderAction>,
}

/// How a snapshot date relates to the session date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayChange {
    /// First date seen by this queue
    Started,
    SameDay,
    /// Later date; the session was reset
    RolledOver,
    /// Earlier date; nothing changed
    Stale,
}

impl Default for ReminderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            date: None,
            active: Vec::new(),
            cursor: None,
            dismissed: BTreeMap::new(),
            dismissed_actions: BTreeSet::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Day the queue was last populated for.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn active(&self) -> &[Reminder] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Reminder> {
        self.cursor.and_then(|i| self.active.get(i))
    }

    /// Move forward one item. Returns `None` at the end, leaving the cursor.
    pub fn next(&mut self) -> Option<&Reminder> {
        let i = self.cursor?;
        if i + 1 >= self.active.len() {
            return None;
        }
        self.cursor = Some(i + 1);
        self.current()
    }

    /// Move back one item. Returns `None` at the start, leaving the cursor.
    pub fn previous(&mut self) -> Option<&Reminder> {
        let i = self.cursor?;
        if i == 0 {
            return None;
        }
        self.cursor = Some(i - 1);
        self.current()
    }

    pub fn navigate_to(&mut self, index: usize) -> Result<&Reminder, ValidationError> {
        let len = self.active.len();
        if index >= len {
            return Err(ValidationError::OutOfBounds {
                collection: "reminders".to_string(),
                index,
                len,
            });
        }
        self.cursor = Some(index);
        Ok(&self.active[index])
    }

    pub fn dismissed(&self) -> &BTreeMap<String, Dismissal> {
        &self.dismissed
    }

    pub fn is_dismissed(&self, id: &str) -> bool {
        self.dismissed.contains_key(id)
    }

    /// Action types of everything dismissed this session.
    pub fn dismissed_actions(&self) -> &BTreeSet<ReminderAction> {
        &self.dismissed_actions
    }

    /// Mark the current reminder completed and move to the new first item.
    pub fn complete_current(&mut self) -> Option<Reminder> {
        self.dismiss_current(Dismissal::Completed)
    }

    /// Same removal as [`Self::complete_current`], recorded as skipped.
    pub fn skip_current(&mut self) -> Option<Reminder> {
        self.dismiss_current(Dismissal::Skipped)
    }

    fn dismiss_current(&mut self, how: Dismissal) -> Option<Reminder> {
        let index = self.cursor?;
        if index >= self.active.len() {
            return None;
        }
        let removed = self.active.remove(index);
        // First dismissal wins
        self.dismissed.entry(removed.id.clone()).or_insert(how);
        self.dismissed_actions.insert(removed.action);
        self.cursor = (!self.active.is_empty()).then_some(0);

        tracing::debug!(
            session_id = %self.session_id,
            reminder_id = %removed.id,
            dismissal = ?how,
            remaining = self.active.len(),
            "dismissed reminder"
        );
        Some(removed)
    }

    /// Start a fresh session: new id, nothing dismissed, empty queue.
    pub fn reset_session(&mut self) {
        *self = Self::new();
    }

    /// Roll the session over if `date` is a later day.
    ///
    /// An earlier date leaves the session alone so a late stale snapshot
    /// cannot clear today's dismissals.
    pub fn begin_day(&mut self, date: NaiveDate) -> DayChange {
        match self.date {
            Some(current) if current == date => DayChange::SameDay,
            Some(current) if date < current => DayChange::Stale,
            Some(current) => {
                tracing::info!(from = %current, to = %date, "reminder day rollover");
                self.reset_session();
                self.date = Some(date);
                DayChange::RolledOver
            }
            None => {
                self.date = Some(date);
                DayChange::Started
            }
        }
    }

    /// Replace the active list, keeping the cursor on the same reminder id
    /// when it is still present and otherwise moving to the first item.
    ///
    /// Dismissed ids are dropped even if the caller passed them in.
    pub fn replace(&mut self, reminders: Vec<Reminder>) {
        let current_id = self.current().map(|r| r.id.clone());
        self.active = reminders
            .into_iter()
            .filter(|r| !self.dismissed.contains_key(&r.id))
            .collect();

        self.cursor = match current_id {
            Some(id) => self.active.iter().position(|r| r.id == id).or(Some(0)),
            None => Some(0),
        }
        .filter(|_| !self.active.is_empty());
    }
}
