//! Day-level logging streaks.
//!
//! A streak counts consecutive calendar days with at least one log.
//! Re-logging the same day is a no-op and a missed day restarts the count
//! without ever lowering the longest streak.

mod calculator;

pub use calculator::{Streak, StreakCalculator, StreakChange, StreakUpdate};
