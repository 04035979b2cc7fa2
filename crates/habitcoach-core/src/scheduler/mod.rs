//! Time-of-day recommendations for habits.
//!
//! Combines the circadian energy profile with category heuristics and the
//! current weather to pick an hour per habit.

mod context;
mod recommender;

pub use context::{EnvironmentalContext, Weather};
pub use recommender::{HabitScheduleRecommendation, ScheduleConfig, ScheduleRecommender};
