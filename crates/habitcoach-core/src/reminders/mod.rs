//! Daily reminder queue.
//!
//! A [`ReminderGenerator`] proposes candidates, the [`SatisfactionChecker`]
//! drops the ones whose goal is already met, fallbacks pad the list to a
//! floor, and the [`ReminderQueue`] tracks the cursor and what the user
//! dismissed this session.

mod engine;
mod generator;
mod queue;
mod satisfaction;
mod types;

pub use engine::{ReminderConfig, ReminderQueueEngine};
pub use generator::{ReminderGenerator, StandardReminderGenerator};
pub use queue::{DayChange, ReminderQueue};
pub use satisfaction::SatisfactionChecker;
pub use types::{
    Dismissal, Reminder, ReminderAction, ReminderCategory, ReminderPriority, HABIT_ID_KEY,
};
