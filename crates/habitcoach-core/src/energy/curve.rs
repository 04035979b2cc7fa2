//! Circadian energy profile types and analyzer.
//!
//! A profile is a typical-day energy curve shifted and scaled by the
//! user's observed sleep. Hours that fall inside the sleep window are
//! clamped to a resting floor.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::health::{HealthEntry, HealthLog};
use crate::patterns::clock;
use crate::scheduler::ScheduleConfig;

/// Typical alertness by hour for a 07:00 riser: peaks 6-9 and 16-18,
/// trough 13-15 and at night.
pub const TYPICAL_ENERGY: [f64; 24] = [
    0.20, 0.15, 0.10, 0.10, 0.15, 0.30, // 00-05
    0.70, 0.85, 0.90, 0.85, 0.75, 0.70, // 06-11
    0.60, 0.45, 0.40, 0.50, 0.75, 0.80, // 12-17
    0.70, 0.60, 0.50, 0.40, 0.30, 0.25, // 18-23
];

/// Energy assigned to hours spent asleep.
const RESTING_ENERGY: f64 = 0.1;

/// Energy level for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyWindow {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Estimated energy level (0.0-1.0)
    pub baseline_energy: f64,
    /// Whether the hour lies inside the usual sleep window
    pub asleep: bool,
}

/// Averages over the trailing sleep logs, or defaults when there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepAverages {
    /// Fractional clock hour, e.g. 22.5 for 22:30
    pub bed_hour: f64,
    pub wake_hour: f64,
    pub duration_hours: f64,
    /// Mean quality 1-10, if any log carried one
    pub quality: Option<f64>,
    /// Number of sleep logs that contributed
    pub sample_count: u64,
}

/// Complete circadian profile for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircadianProfile {
    /// 24 hourly windows, index = hour
    pub windows: Vec<EnergyWindow>,
    pub sleep: SleepAverages,
    /// 0.0-1.0, how pronounced and regular the rhythm is
    pub rhythm_strength: f64,
    /// 0.0-1.0, grows with the number of sleep logs
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

impl CircadianProfile {
    /// Calculate confidence from sample count.
    pub fn calculate_confidence(sample_count: u64, min_samples: u64) -> f64 {
        match sample_count {
            0 => 0.0,
            1..=2 => 0.1,
            3..=5 => 0.3,
            6..=10 => 0.6,
            _ => {
                // Approaches 1.0 asymptotically
                let excess = sample_count.saturating_sub(min_samples) as f64;
                (0.8 + 0.2 * (1.0 - (-excess / 10.0).exp())).min(1.0)
            }
        }
    }

    /// Energy at an hour (wraps modulo 24).
    pub fn get_energy(&self, hour: u32) -> f64 {
        self.windows
            .get((hour % 24) as usize)
            .map(|w| w.baseline_energy)
            .unwrap_or(RESTING_ENERGY)
    }

    pub fn is_asleep(&self, hour: u32) -> bool {
        self.windows
            .get((hour % 24) as usize)
            .map(|w| w.asleep)
            .unwrap_or(false)
    }

    /// Awake hour with the highest energy; earliest hour wins ties.
    pub fn peak_hour(&self) -> u32 {
        self.best_hour_in(0..=23).unwrap_or(9)
    }

    /// Awake hour with the highest energy inside `hours`.
    pub fn best_hour_in<I>(&self, hours: I) -> Option<u32>
    where
        I: IntoIterator<Item = u32>,
    {
        hours
            .into_iter()
            .filter(|h| !self.is_asleep(*h))
            .fold(None, |best: Option<u32>, h| match best {
                Some(b) if self.get_energy(b) >= self.get_energy(h) => Some(b),
                _ => Some(h),
            })
    }

    /// Awake hours at or above `min_energy`, ascending.
    pub fn get_recommended_hours(&self, min_energy: f64) -> Vec<u32> {
        self.windows
            .iter()
            .filter(|w| !w.asleep && w.baseline_energy >= min_energy)
            .map(|w| w.hour as u32)
            .collect()
    }

    fn max_over(&self, from: u32, to: u32) -> f64 {
        (from..=to).map(|h| self.get_energy(h)).fold(0.0, f64::max)
    }

    fn min_over(&self, from: u32, to: u32) -> f64 {
        (from..=to).map(|h| self.get_energy(h)).fold(1.0, f64::min)
    }

    /// A morning peak between 06:00 and 10:59.
    pub fn has_morning_peak(&self) -> bool {
        self.max_over(6, 10) >= 0.7
    }

    /// Energy falling off in the evening, at least 0.2 below the
    /// late-afternoon peak somewhere between 19:00 and 22:59.
    pub fn has_evening_dip(&self) -> bool {
        self.min_over(19, 22) + 0.2 <= self.max_over(16, 18)
    }

    /// Render the profile as an ASCII chart.
    pub fn render_ascii_chart(&self) -> String {
        let mut output = String::from("\nDaily Energy Profile:\n");
        output.push_str(&"─".repeat(50));
        output.push('\n');

        for window in &self.windows {
            let bar_length = (window.baseline_energy.clamp(0.0, 1.0) * 30.0) as usize;
            let bar = "█".repeat(bar_length);
            let empty = " ".repeat(30 - bar_length);
            let marker = if window.asleep { "z" } else { " " };

            output.push_str(&format!(
                "{:02}:00 {}{}{} {:.0}%\n",
                window.hour,
                bar,
                empty,
                marker,
                window.baseline_energy * 100.0
            ));
        }

        output.push_str(&"─".repeat(50));
        output.push_str(&format!(
            "\nRhythm strength {:.0}%  z asleep\n",
            self.rhythm_strength * 100.0
        ));
        output
    }
}

/// Builds [`CircadianProfile`]s from sleep logs.
#[derive(Debug, Clone)]
pub struct CircadianAnalyzer {
    config: ScheduleConfig,
    offset: FixedOffset,
}

impl CircadianAnalyzer {
    pub fn new(config: ScheduleConfig, offset: FixedOffset) -> Self {
        Self { config, offset }
    }

    fn default_hours(&self) -> (f64, f64) {
        let parse = |raw: &str, fallback: f64| {
            chrono::NaiveTime::parse_from_str(raw, "%H:%M")
                .map(|t| t.hour() as f64 + t.minute() as f64 / 60.0)
                .unwrap_or(fallback)
        };
        (
            parse(&self.config.default_bed_time, 22.5),
            parse(&self.config.default_wake_time, 7.0),
        )
    }

    /// Average the sleep logs in the trailing look-back window.
    ///
    /// Unparsable clock times and out-of-range values are skipped for the
    /// affected field only.
    pub fn sleep_averages(&self, logs: &[HealthLog], as_of: DateTime<Utc>) -> SleepAverages {
        let start = as_of - Duration::days(self.config.sleep_lookback_days);
        let nights: Vec<_> = logs
            .iter()
            .filter(|l| l.logged_at > start && l.logged_at <= as_of)
            .filter_map(|l| match &l.entry {
                HealthEntry::Sleep(sleep) => Some(sleep),
                _ => None,
            })
            .collect();

        let (default_bed, default_wake) = self.default_hours();
        if nights.is_empty() {
            return SleepAverages {
                bed_hour: default_bed,
                wake_hour: default_wake,
                duration_hours: self.config.default_sleep_hours,
                quality: None,
                sample_count: 0,
            };
        }

        let to_hour = |t: chrono::NaiveTime| t.hour() as f64 + t.minute() as f64 / 60.0;
        let beds: Vec<f64> = nights.iter().filter_map(|n| n.bed_time()).map(to_hour).collect();
        let wakes: Vec<f64> = nights.iter().filter_map(|n| n.wake_time()).map(to_hour).collect();
        let durations: Vec<f64> = nights
            .iter()
            .map(|n| n.duration_hours)
            .filter(|d| d.is_finite() && *d > 0.0 && *d <= 24.0)
            .collect();
        let qualities: Vec<f64> = nights
            .iter()
            .map(|n| n.quality)
            .filter(|q| (1..=10).contains(q))
            .map(f64::from)
            .collect();

        if beds.len() < nights.len() || wakes.len() < nights.len() {
            tracing::warn!(
                nights = nights.len(),
                valid_bed_times = beds.len(),
                valid_wake_times = wakes.len(),
                "skipped sleep logs with unparsable clock times"
            );
        }

        let mean = |values: &[f64]| -> Option<f64> {
            (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
        };

        SleepAverages {
            bed_hour: clock::mean_hour(&beds).unwrap_or(default_bed),
            wake_hour: clock::mean_hour(&wakes).unwrap_or(default_wake),
            duration_hours: mean(&durations).unwrap_or(self.config.default_sleep_hours),
            quality: mean(&qualities),
            sample_count: nights.len() as u64,
        }
    }

    /// Compute the profile from today's view of the sleep logs.
    pub fn compute_profile(&self, logs: &[HealthLog], as_of: DateTime<Utc>) -> CircadianProfile {
        let sleep = self.sleep_averages(logs, as_of);
        let windows = Self::blend(&sleep);

        let mut profile = CircadianProfile {
            windows,
            confidence: CircadianProfile::calculate_confidence(sleep.sample_count, 7),
            sleep,
            rhythm_strength: 0.0,
            last_updated: as_of,
        };
        profile.rhythm_strength = Self::rhythm_strength(&profile);

        tracing::debug!(
            nights = profile.sleep.sample_count,
            rhythm_strength = profile.rhythm_strength,
            peak_hour = profile.peak_hour(),
            local_hour = as_of.with_timezone(&self.offset).hour(),
            "computed circadian profile"
        );
        profile
    }

    /// Shift the typical curve by wake time and scale it by sleep quantity
    /// and quality.
    fn blend(sleep: &SleepAverages) -> Vec<EnergyWindow> {
        let mut shift = sleep.wake_hour - 7.0;
        if shift > 12.0 {
            shift -= 24.0;
        }
        let shift = shift.clamp(-4.0, 4.0);

        let duration_factor = (sleep.duration_hours / 8.0).clamp(0.7, 1.1);
        let quality_factor = sleep
            .quality
            .map(|q| (0.85 + 0.03 * (q - 5.0)).clamp(0.85, 1.1))
            .unwrap_or(1.0);
        let factor = duration_factor * quality_factor;

        let window_len = (sleep.wake_hour - sleep.bed_hour).rem_euclid(24.0);

        (0..24u8)
            .map(|hour| {
                let source = ((hour as f64 - shift).round() as i64).rem_euclid(24) as usize;
                let from_bed = (hour as f64 - sleep.bed_hour).rem_euclid(24.0);
                let asleep = from_bed + 1.0 <= window_len + 1e-6;
                let energy = (TYPICAL_ENERGY[source] * factor).clamp(0.0, 1.0);

                EnergyWindow {
                    hour,
                    baseline_energy: if asleep { energy.min(RESTING_ENERGY) } else { energy },
                    asleep,
                }
            })
            .collect()
    }

    fn rhythm_strength(profile: &CircadianProfile) -> f64 {
        let mut strength = 0.0;
        if profile.has_morning_peak() {
            strength += 0.3;
        }
        if profile.has_evening_dip() {
            strength += 0.3;
        }

        let sleep = &profile.sleep;
        let bed = sleep.bed_hour;
        if bed >= 21.0 || bed < 1.0 {
            strength += 0.1;
        }
        if (5.0..=9.0).contains(&sleep.wake_hour) {
            strength += 0.1;
        }
        if (7.0..=9.0).contains(&sleep.duration_hours) {
            strength += 0.1;
        }
        if sleep.quality.is_some_and(|q| q >= 7.0) {
            strength += 0.05;
        }
        f64::min(strength, 1.0)
    }
}
