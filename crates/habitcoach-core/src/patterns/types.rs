//! Pattern finding types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of behavioral pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    Consistency,
    Timing,
    WeekdayWeekend,
    Sequential,
    /// Reserved for weather/location signals; no miner produces it yet
    Environmental,
    StressCorrelated,
}

/// Look-back window for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWindow {
    Week,
    Month,
    Quarter,
    Year,
}

impl AnalysisWindow {
    pub fn days(&self) -> i64 {
        match self {
            AnalysisWindow::Week => 7,
            AnalysisWindow::Month => 30,
            AnalysisWindow::Quarter => 90,
            AnalysisWindow::Year => 365,
        }
    }
}

/// Measurements behind a finding, typed per pattern kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternDetail {
    Consistency {
        average_gap_days: f64,
        ideal_gap_days: f64,
    },
    Timing {
        /// Circular mean on the 24h clock
        mean_hour: f64,
        /// Mean clock distance from `mean_hour`, in hours
        deviation_hours: f64,
    },
    WeekdayWeekend {
        weekday_ratio: f64,
        weekend_ratio: f64,
    },
    Sequential {
        correlated_habit_id: String,
        co_occurrence: f64,
        shared_days: usize,
    },
    StressCorrelated {
        high_stress_rate: f64,
        low_stress_rate: f64,
    },
}

/// One observation supporting a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDataPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub context: String,
}

/// A threshold-gated observation about one habit's history.
///
/// Always derived from raw logs; never authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitPattern {
    pub habit_id: String,
    pub pattern_type: PatternType,
    /// 0.0-1.0
    pub strength: f64,
    pub description: String,
    pub insight: String,
    pub actionable_advice: String,
    pub data_points: Vec<PatternDataPoint>,
    pub detail: PatternDetail,
}

impl HabitPattern {
    /// Mean completion hour, if this is a timing finding.
    pub fn mean_hour(&self) -> Option<f64> {
        match self.detail {
            PatternDetail::Timing { mean_hour, .. } => Some(mean_hour),
            _ => None,
        }
    }
}
