//! Behavioral pattern mining.
//!
//! Detectors look at one habit's completions inside an analysis window and
//! report consistency, time-of-day clustering, weekday/weekend skew,
//! same-day co-occurrence with other habits and stress sensitivity.

pub(crate) mod clock;
mod miner;
mod types;

pub use miner::{MiningInput, PatternConfig, PatternMiner};
pub(crate) use miner::format_hour;
pub use types::{AnalysisWindow, HabitPattern, PatternDataPoint, PatternDetail, PatternType};
