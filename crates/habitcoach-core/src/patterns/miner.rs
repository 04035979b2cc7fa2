//! Threshold-gated pattern mining over a habit's completion history.
//!
//! Each detector needs a minimum amount of evidence. Below it the detector
//! returns `None`; insufficient data is not an error.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::clock;
use super::types::{AnalysisWindow, HabitPattern, PatternDataPoint, PatternDetail, PatternType};
use crate::habit::{distinct_dates, Habit, HabitCompletion, HabitFrequency};
use crate::health::DailyLog;

/// Thresholds for the pattern detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_consistency_min_points")]
    pub consistency_min_points: usize,
    /// Emitted only when strength is strictly above this
    #[serde(default = "default_consistency_min_strength")]
    pub consistency_min_strength: f64,
    #[serde(default = "default_timing_min_points")]
    pub timing_min_points: usize,
    #[serde(default = "default_timing_min_valid_times")]
    pub timing_min_valid_times: usize,
    #[serde(default = "default_timing_min_strength")]
    pub timing_min_strength: f64,
    #[serde(default = "default_weekday_min_points")]
    pub weekday_min_points: usize,
    #[serde(default = "default_weekday_min_ratio_diff")]
    pub weekday_min_ratio_diff: f64,
    #[serde(default = "default_sequential_min_points")]
    pub sequential_min_points: usize,
    #[serde(default = "default_sequential_min_co_occurrence")]
    pub sequential_min_co_occurrence: f64,
    #[serde(default = "default_stress_min_days")]
    pub stress_min_days: usize,
    #[serde(default = "default_stress_min_rate_diff")]
    pub stress_min_rate_diff: f64,
}

fn default_consistency_min_points() -> usize {
    7
}
fn default_consistency_min_strength() -> f64 {
    0.8
}
fn default_timing_min_points() -> usize {
    5
}
fn default_timing_min_valid_times() -> usize {
    3
}
fn default_timing_min_strength() -> f64 {
    0.6
}
fn default_weekday_min_points() -> usize {
    10
}
fn default_weekday_min_ratio_diff() -> f64 {
    0.2
}
fn default_sequential_min_points() -> usize {
    5
}
fn default_sequential_min_co_occurrence() -> f64 {
    0.6
}
fn default_stress_min_days() -> usize {
    10
}
fn default_stress_min_rate_diff() -> f64 {
    0.3
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            consistency_min_points: default_consistency_min_points(),
            consistency_min_strength: default_consistency_min_strength(),
            timing_min_points: default_timing_min_points(),
            timing_min_valid_times: default_timing_min_valid_times(),
            timing_min_strength: default_timing_min_strength(),
            weekday_min_points: default_weekday_min_points(),
            weekday_min_ratio_diff: default_weekday_min_ratio_diff(),
            sequential_min_points: default_sequential_min_points(),
            sequential_min_co_occurrence: default_sequential_min_co_occurrence(),
            stress_min_days: default_stress_min_days(),
            stress_min_rate_diff: default_stress_min_rate_diff(),
        }
    }
}

/// Stress scores at or above this count as a high-stress day.
const HIGH_STRESS: u8 = 7;
/// Stress scores at or below this count as a low-stress day.
const LOW_STRESS: u8 = 4;

/// Read-only inputs for one mining run.
#[derive(Debug, Clone, Copy)]
pub struct MiningInput<'a> {
    pub habits: &'a [Habit],
    pub completions: &'a [HabitCompletion],
    pub daily_logs: &'a [DailyLog],
    pub window: AnalysisWindow,
    pub as_of: DateTime<Utc>,
}

/// Mines [`HabitPattern`]s from completion history.
#[derive(Debug, Clone)]
pub struct PatternMiner {
    config: PatternConfig,
    offset: FixedOffset,
}

impl PatternMiner {
    /// Create a miner with default thresholds for the given local zone.
    pub fn new(offset: FixedOffset) -> Self {
        Self::with_config(PatternConfig::default(), offset)
    }

    pub fn with_config(config: PatternConfig, offset: FixedOffset) -> Self {
        Self { config, offset }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    fn in_window<'a>(
        &self,
        completions: &'a [HabitCompletion],
        habit_id: &str,
        window: AnalysisWindow,
        as_of: DateTime<Utc>,
    ) -> Vec<&'a HabitCompletion> {
        let start = as_of - Duration::days(window.days());
        completions
            .iter()
            .filter(|c| c.habit_id == habit_id && c.completed_at > start && c.completed_at <= as_of)
            .collect()
    }

    /// Mine every active habit; results sorted by descending strength.
    pub fn mine_all(&self, input: &MiningInput<'_>) -> Vec<HabitPattern> {
        let mut patterns: Vec<HabitPattern> = input
            .habits
            .iter()
            .filter(|h| h.is_active)
            .flat_map(|h| self.mine_habit(h, input))
            .collect();
        sort_by_strength(&mut patterns);
        patterns
    }

    /// Mine one habit; results sorted by descending strength.
    pub fn mine_habit(&self, habit: &Habit, input: &MiningInput<'_>) -> Vec<HabitPattern> {
        let history = self.in_window(input.completions, &habit.id, input.window, input.as_of);
        let mut patterns = Vec::new();

        patterns.extend(self.detect_consistency(habit, &history));
        patterns.extend(self.detect_timing(habit, &history));
        patterns.extend(self.detect_weekday_weekend(habit, &history));
        patterns.extend(self.detect_sequential(habit, &history, input));
        patterns.extend(self.detect_stress_correlation(habit, &history, input));

        tracing::debug!(
            habit_id = %habit.id,
            completions = history.len(),
            found = patterns.len(),
            "mined habit patterns"
        );

        sort_by_strength(&mut patterns);
        patterns
    }

    /// Regular spacing between completion days.
    pub fn detect_consistency(
        &self,
        habit: &Habit,
        history: &[&HabitCompletion],
    ) -> Option<HabitPattern> {
        let dates: Vec<NaiveDate> = distinct_dates(history.iter().copied(), &self.offset)
            .into_iter()
            .collect();
        // Gaps are measured between days, so several logs on one day count once
        if dates.len() < self.config.consistency_min_points.max(2) {
            return None;
        }

        let gaps: Vec<f64> = dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days() as f64)
            .collect();
        let average_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        let ideal_gap = match habit.frequency {
            HabitFrequency::Weekly => 7.0,
            HabitFrequency::Daily | HabitFrequency::Custom => 1.0,
        };

        let strength = 1.0 / (1.0 + (average_gap - ideal_gap).abs());
        if strength <= self.config.consistency_min_strength {
            return None;
        }

        let mut data_points = vec![PatternDataPoint {
            date: dates[0],
            value: 0.0,
            context: "gap_days".to_string(),
        }];
        data_points.extend(dates.iter().skip(1).zip(&gaps).map(|(d, g)| PatternDataPoint {
            date: *d,
            value: *g,
            context: "gap_days".to_string(),
        }));

        let (description, insight, advice) = if strength >= 0.95 {
            (
                format!("You complete {} like clockwork", habit.title),
                format!(
                    "Across {} days your average gap is {:.1} days, right on target.",
                    dates.len(),
                    average_gap
                ),
                "This routine is locked in. Consider raising the target a little.".to_string(),
            )
        } else {
            (
                format!("You complete {} consistently", habit.title),
                format!(
                    "Your average gap is {:.1} days against an ideal of {:.0}.",
                    average_gap, ideal_gap
                ),
                "Keep the same cue and time of day to hold this rhythm.".to_string(),
            )
        };

        Some(HabitPattern {
            habit_id: habit.id.clone(),
            pattern_type: PatternType::Consistency,
            strength,
            description,
            insight,
            actionable_advice: advice,
            data_points,
            detail: PatternDetail::Consistency {
                average_gap_days: average_gap,
                ideal_gap_days: ideal_gap,
            },
        })
    }

    /// Clustering of completions around one time of day.
    ///
    /// Completions stamped at exactly local midnight carry no time of day
    /// (date-only entries) and are not counted as valid times.
    pub fn detect_timing(&self, habit: &Habit, history: &[&HabitCompletion]) -> Option<HabitPattern> {
        if history.len() < self.config.timing_min_points {
            return None;
        }

        let timed: Vec<(NaiveDate, f64)> = history
            .iter()
            .filter(|c| {
                let local = c.completed_at.with_timezone(&self.offset);
                local.num_seconds_from_midnight() != 0 || local.nanosecond() != 0
            })
            .map(|c| (c.local_date(&self.offset), c.local_hour(&self.offset)))
            .collect();
        if timed.len() < self.config.timing_min_valid_times {
            return None;
        }

        let hours: Vec<f64> = timed.iter().map(|(_, h)| *h).collect();
        let mean_hour = clock::mean_hour(&hours)?;
        let deviation = clock::mean_absolute_deviation(&hours, mean_hour);
        let strength = 1.0 / (1.0 + deviation);
        if strength < self.config.timing_min_strength {
            return None;
        }

        let clock_label = format_hour(mean_hour);
        let (description, insight) = if strength >= 0.8 {
            (
                format!("You almost always do {} around {}", habit.title, clock_label),
                format!("Completions stay within about {:.0} minutes of {}.", deviation * 60.0, clock_label),
            )
        } else {
            (
                format!("You usually do {} around {}", habit.title, clock_label),
                format!("Most completions fall within {:.1} hours of {}.", deviation, clock_label),
            )
        };

        Some(HabitPattern {
            habit_id: habit.id.clone(),
            pattern_type: PatternType::Timing,
            strength,
            description,
            insight,
            actionable_advice: format!(
                "Set a reminder a few minutes before {clock_label} to protect this slot."
            ),
            data_points: timed
                .into_iter()
                .map(|(date, hour)| PatternDataPoint {
                    date,
                    value: hour,
                    context: "time_of_day".to_string(),
                })
                .collect(),
            detail: PatternDetail::Timing {
                mean_hour,
                deviation_hours: deviation,
            },
        })
    }

    /// Skew of completions towards weekdays or weekends.
    pub fn detect_weekday_weekend(
        &self,
        habit: &Habit,
        history: &[&HabitCompletion],
    ) -> Option<HabitPattern> {
        if history.len() < self.config.weekday_min_points {
            return None;
        }

        let mut data_points = Vec::with_capacity(history.len());
        let mut weekend = 0usize;
        for c in history {
            let date = c.local_date(&self.offset);
            let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            if is_weekend {
                weekend += 1;
            }
            data_points.push(PatternDataPoint {
                date,
                value: c.value,
                context: if is_weekend { "weekend" } else { "weekday" }.to_string(),
            });
        }

        let total = history.len() as f64;
        let weekend_ratio = weekend as f64 / total;
        let weekday_ratio = 1.0 - weekend_ratio;
        let diff = weekday_ratio - weekend_ratio;
        if diff.abs() < self.config.weekday_min_ratio_diff {
            return None;
        }

        let strength = diff.abs().min(1.0);
        let (description, insight, advice) = if diff > 0.0 {
            (
                format!("{} happens mostly on weekdays", habit.title),
                format!(
                    "{:.0}% of completions fall Monday to Friday.",
                    weekday_ratio * 100.0
                ),
                "Plan a lighter weekend version so the routine survives Saturday and Sunday."
                    .to_string(),
            )
        } else {
            (
                format!("{} happens mostly on weekends", habit.title),
                format!(
                    "{:.0}% of completions fall on Saturday or Sunday.",
                    weekend_ratio * 100.0
                ),
                "Anchor a short weekday session to an existing work-day routine.".to_string(),
            )
        };

        Some(HabitPattern {
            habit_id: habit.id.clone(),
            pattern_type: PatternType::WeekdayWeekend,
            strength,
            description,
            insight: if strength >= 0.6 {
                format!("{insight} That is a strong split.")
            } else {
                insight
            },
            actionable_advice: advice,
            data_points,
            detail: PatternDetail::WeekdayWeekend {
                weekday_ratio,
                weekend_ratio,
            },
        })
    }

    /// Other habits that reliably land on the same days as this one.
    pub fn detect_sequential(
        &self,
        habit: &Habit,
        history: &[&HabitCompletion],
        input: &MiningInput<'_>,
    ) -> Vec<HabitPattern> {
        if history.len() < self.config.sequential_min_points {
            return Vec::new();
        }

        let anchor_dates = distinct_dates(history.iter().copied(), &self.offset);
        let mut other_dates: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
        let start = input.as_of - Duration::days(input.window.days());
        for c in input.completions {
            if c.habit_id == habit.id || c.completed_at <= start || c.completed_at > input.as_of {
                continue;
            }
            other_dates
                .entry(c.habit_id.as_str())
                .or_default()
                .insert(c.local_date(&self.offset));
        }

        let mut patterns: Vec<HabitPattern> = other_dates
            .into_iter()
            .filter_map(|(other_id, dates)| {
                let shared: Vec<NaiveDate> = anchor_dates.intersection(&dates).copied().collect();
                let co_occurrence = shared.len() as f64 / anchor_dates.len() as f64;
                if co_occurrence < self.config.sequential_min_co_occurrence {
                    return None;
                }

                let other_title = input
                    .habits
                    .iter()
                    .find(|h| h.id == other_id)
                    .map(|h| h.title.as_str())
                    .unwrap_or(other_id);
                let pct = co_occurrence * 100.0;
                let insight = if co_occurrence >= 0.8 {
                    format!("These two are practically a routine already: {pct:.0}% overlap.")
                } else {
                    format!("They share {pct:.0}% of your completion days.")
                };

                Some(HabitPattern {
                    habit_id: habit.id.clone(),
                    pattern_type: PatternType::Sequential,
                    strength: co_occurrence,
                    description: format!("{} often happens on the same days as {}", habit.title, other_title),
                    insight,
                    actionable_advice: format!(
                        "Do {} right after {} to turn the pair into one routine.",
                        habit.title, other_title
                    ),
                    data_points: shared
                        .iter()
                        .map(|d| PatternDataPoint {
                            date: *d,
                            value: 1.0,
                            context: other_id.to_string(),
                        })
                        .collect(),
                    detail: PatternDetail::Sequential {
                        correlated_habit_id: other_id.to_string(),
                        co_occurrence,
                        shared_days: shared.len(),
                    },
                })
            })
            .collect();

        sort_by_strength(&mut patterns);
        patterns
    }

    /// Difference in completion rate between high- and low-stress days.
    pub fn detect_stress_correlation(
        &self,
        habit: &Habit,
        history: &[&HabitCompletion],
        input: &MiningInput<'_>,
    ) -> Option<HabitPattern> {
        let as_of_date = input.as_of.with_timezone(&self.offset).date_naive();
        let start_date = as_of_date - Duration::days(input.window.days() - 1);
        let completed = distinct_dates(history.iter().copied(), &self.offset);

        let mut high = (0usize, 0usize);
        let mut low = (0usize, 0usize);
        let mut data_points = Vec::new();
        for log in input.daily_logs {
            let Some(stress) = log.stress else { continue };
            if log.date < start_date || log.date > as_of_date {
                continue;
            }
            let done = completed.contains(&log.date);
            let bucket = if stress >= HIGH_STRESS {
                &mut high
            } else if stress <= LOW_STRESS {
                &mut low
            } else {
                continue;
            };
            bucket.0 += 1;
            if done {
                bucket.1 += 1;
            }
            data_points.push(PatternDataPoint {
                date: log.date,
                value: stress as f64,
                context: if done { "completed" } else { "missed" }.to_string(),
            });
        }

        if high.0 + low.0 < self.config.stress_min_days || high.0 == 0 || low.0 == 0 {
            return None;
        }

        let high_rate = high.1 as f64 / high.0 as f64;
        let low_rate = low.1 as f64 / low.0 as f64;
        let diff = low_rate - high_rate;
        if diff.abs() < self.config.stress_min_rate_diff {
            return None;
        }

        let (description, advice) = if diff > 0.0 {
            (
                format!("{} tends to slip on stressful days", habit.title),
                "Define a two-minute fallback version for high-stress days.".to_string(),
            )
        } else {
            (
                format!("You lean on {} when stress is high", habit.title),
                "This works as a coping habit. Keep it easy to start when things get hectic."
                    .to_string(),
            )
        };

        Some(HabitPattern {
            habit_id: habit.id.clone(),
            pattern_type: PatternType::StressCorrelated,
            strength: diff.abs().min(1.0),
            description,
            insight: format!(
                "Completion rate is {:.0}% on high-stress days and {:.0}% on calm days.",
                high_rate * 100.0,
                low_rate * 100.0
            ),
            actionable_advice: advice,
            data_points,
            detail: PatternDetail::StressCorrelated {
                high_stress_rate: high_rate,
                low_stress_rate: low_rate,
            },
        })
    }
}

fn sort_by_strength(patterns: &mut [HabitPattern]) {
    patterns.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| a.habit_id.cmp(&b.habit_id))
    });
}

/// `8.5` -> `"08:30"`.
pub(crate) fn format_hour(hour: f64) -> String {
    let total_minutes = (hour.rem_euclid(24.0) * 60.0).round() as u32 % (24 * 60);
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitCategory;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn habit(id: &str, frequency: HabitFrequency) -> Habit {
        Habit {
            id: id.to_string(),
            title: format!("Habit {id}"),
            category: HabitCategory::Health,
            frequency,
            target_value: 1.0,
            unit: "times".to_string(),
            is_active: true,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn done(habit_id: &str, when: DateTime<Utc>) -> HabitCompletion {
        HabitCompletion {
            habit_id: habit_id.to_string(),
            completed_at: when,
            value: 1.0,
            notes: None,
        }
    }

    #[test]
    fn consistency_needs_seven_points() {
        let miner = PatternMiner::new(utc());
        let h = habit("h1", HabitFrequency::Daily);
        let log: Vec<_> = (1..=6).map(|d| done("h1", at(2024, 1, d, 8, 0))).collect();
        let refs: Vec<_> = log.iter().collect();
        assert!(miner.detect_consistency(&h, &refs).is_none());

        let log: Vec<_> = (1..=7).map(|d| done("h1", at(2024, 1, d, 8, 0))).collect();
        let refs: Vec<_> = log.iter().collect();
        let p = miner.detect_consistency(&h, &refs).unwrap();
        assert_eq!(p.strength, 1.0);
        assert_eq!(p.pattern_type, PatternType::Consistency);
    }

    #[test]
    fn consistency_counts_days_not_logs() {
        let miner = PatternMiner::new(utc());
        let h = habit("h1", HabitFrequency::Daily);
        let log: Vec<_> = (0..7)
            .map(|i| done("h1", at(2024, 1, 1 + i / 4, 8 + i, 0)))
            .collect();
        let refs: Vec<_> = log.iter().collect();
        assert_eq!(refs.len(), 7);
        assert!(miner.detect_consistency(&h, &refs).is_none());
    }

    #[test]
    fn consistency_uses_weekly_ideal_gap() {
        let miner = PatternMiner::new(utc());
        let weekly = habit("h1", HabitFrequency::Weekly);
        let log: Vec<_> = (0..8)
            .map(|w| done("h1", at(2024, 1, 1, 9, 0) + Duration::days(7 * w)))
            .collect();
        let refs: Vec<_> = log.iter().collect();
        assert!(miner.detect_consistency(&weekly, &refs).is_some());

        let daily = habit("h1", HabitFrequency::Daily);
        assert!(miner.detect_consistency(&daily, &refs).is_none());
    }

    #[test]
    fn timing_detects_tight_cluster() {
        let miner = PatternMiner::new(utc());
        let h = habit("h1", HabitFrequency::Daily);
        let log: Vec<_> = (1..=6)
            .map(|d| done("h1", at(2024, 1, d, 7, if d % 2 == 0 { 0 } else { 15 })))
            .collect();
        let refs: Vec<_> = log.iter().collect();

        let p = miner.detect_timing(&h, &refs).unwrap();
        let mean = p.mean_hour().unwrap();
        assert!((mean - 7.125).abs() < 0.01);
        assert!(p.strength > 0.8);
    }

    #[test]
    fn timing_ignores_date_only_entries() {
        let miner = PatternMiner::new(utc());
        let h = habit("h1", HabitFrequency::Daily);
        let mut log: Vec<_> = (1..=4).map(|d| done("h1", at(2024, 1, d, 0, 0))).collect();
        log.push(done("h1", at(2024, 1, 5, 9, 0)));
        log.push(done("h1", at(2024, 1, 6, 9, 0)));
        let refs: Vec<_> = log.iter().collect();

        // Only two valid times out of six completions
        assert!(miner.detect_timing(&h, &refs).is_none());
    }

    #[test]
    fn timing_rejects_scattered_times() {
        let miner = PatternMiner::new(utc());
        let h = habit("h1", HabitFrequency::Daily);
        let hours = [6, 10, 14, 18, 22, 9];
        let log: Vec<_> = hours
            .iter()
            .enumerate()
            .map(|(i, hr)| done("h1", at(2024, 1, i as u32 + 1, *hr, 15)))
            .collect();
        let refs: Vec<_> = log.iter().collect();
        assert!(miner.detect_timing(&h, &refs).is_none());
    }

    #[test]
    fn weekday_weekend_split() {
        let miner = PatternMiner::new(utc());
        let h = habit("h1", HabitFrequency::Daily);
        // 2024-01-01 is a Monday; the 6th is a Saturday
        let mut log: Vec<_> = [1, 2, 3, 4, 5, 8, 9, 10, 11]
            .iter()
            .map(|d| done("h1", at(2024, 1, *d, 8, 0)))
            .collect();
        log.push(done("h1", at(2024, 1, 6, 8, 0)));
        let refs: Vec<_> = log.iter().collect();

        let p = miner.detect_weekday_weekend(&h, &refs).unwrap();
        assert!((p.strength - 0.8).abs() < 1e-9);
        assert!(p.description.contains("weekdays"));

        let refs6: Vec<_> = log.iter().take(6).collect();
        assert!(miner.detect_weekday_weekend(&h, &refs6).is_none());
    }

    #[test]
    fn sequential_finds_co_occurring_habit() {
        let miner = PatternMiner::new(utc());
        let habits = vec![habit("a", HabitFrequency::Daily), habit("b", HabitFrequency::Daily)];
        let mut log = Vec::new();
        for d in 1..=5 {
            log.push(done("a", at(2024, 1, d, 7, 0)));
        }
        for d in 1..=4 {
            log.push(done("b", at(2024, 1, d, 7, 30)));
        }
        let input = MiningInput {
            habits: &habits,
            completions: &log,
            daily_logs: &[],
            window: AnalysisWindow::Month,
            as_of: at(2024, 1, 6, 0, 0),
        };

        let patterns = miner.mine_habit(&habits[0], &input);
        let seq = patterns
            .iter()
            .find(|p| p.pattern_type == PatternType::Sequential)
            .unwrap();
        assert!((seq.strength - 0.8).abs() < 1e-9);
        assert!(seq.actionable_advice.contains("Habit b"));
        match &seq.detail {
            PatternDetail::Sequential { correlated_habit_id, shared_days, .. } => {
                assert_eq!(correlated_habit_id, "b");
                assert_eq!(*shared_days, 4);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn stress_correlation_detects_slip() {
        let miner = PatternMiner::new(utc());
        let habits = vec![habit("a", HabitFrequency::Daily)];
        let mut logs = Vec::new();
        let mut log = Vec::new();
        for d in 1..=12u32 {
            let stressed = d % 2 == 0;
            logs.push(DailyLog {
                date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                stress: Some(if stressed { 8 } else { 3 }),
                ..DailyLog::default()
            });
            if !stressed {
                log.push(done("a", at(2024, 1, d, 7, 0)));
            }
        }
        let input = MiningInput {
            habits: &habits,
            completions: &log,
            daily_logs: &logs,
            window: AnalysisWindow::Month,
            as_of: at(2024, 1, 13, 0, 0),
        };

        let refs: Vec<_> = log.iter().collect();
        let p = miner.detect_stress_correlation(&habits[0], &refs, &input).unwrap();
        assert_eq!(p.strength, 1.0);
        assert!(p.description.contains("slip"));
    }

    #[test]
    fn window_excludes_old_completions() {
        let miner = PatternMiner::new(utc());
        let habits = vec![habit("a", HabitFrequency::Daily)];
        let log: Vec<_> = (1..=10).map(|d| done("a", at(2024, 1, d, 8, 0))).collect();
        let input = MiningInput {
            habits: &habits,
            completions: &log,
            daily_logs: &[],
            window: AnalysisWindow::Week,
            as_of: at(2024, 3, 1, 0, 0),
        };
        assert!(miner.mine_all(&input).is_empty());
    }

    #[test]
    fn results_sorted_by_strength() {
        let miner = PatternMiner::new(utc());
        let habits = vec![habit("a", HabitFrequency::Daily)];
        let log: Vec<_> = (1..=14)
            .map(|d| done("a", at(2024, 1, d, 8, (d * 4) % 60)))
            .collect();
        let input = MiningInput {
            habits: &habits,
            completions: &log,
            daily_logs: &[],
            window: AnalysisWindow::Month,
            as_of: at(2024, 1, 20, 0, 0),
        };

        let patterns = miner.mine_all(&input);
        assert!(patterns.len() >= 2);
        assert!(patterns.windows(2).all(|w| w[0].strength >= w[1].strength));
    }

    #[test]
    fn format_hour_pads() {
        assert_eq!(format_hour(8.5), "08:30");
        assert_eq!(format_hour(23.99), "23:59");
        assert_eq!(format_hour(0.0), "00:00");
    }
}
