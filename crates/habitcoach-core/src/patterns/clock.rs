//! Circular statistics on the 24-hour clock.

use std::f64::consts::TAU;

const HOURS_PER_DAY: f64 = 24.0;

/// Circular mean of fractional hours, in `[0, 24)`.
///
/// Returns `None` for an empty slice.
pub fn mean_hour(hours: &[f64]) -> Option<f64> {
    if hours.is_empty() {
        return None;
    }

    let (sin_sum, cos_sum) = hours.iter().fold((0.0, 0.0), |(s, c), h| {
        let angle = h / HOURS_PER_DAY * TAU;
        (s + angle.sin(), c + angle.cos())
    });

    let mean = sin_sum.atan2(cos_sum) / TAU * HOURS_PER_DAY;
    Some(mean.rem_euclid(HOURS_PER_DAY))
}

/// Shortest distance between two clock hours, in `[0, 12]`.
pub fn distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(HOURS_PER_DAY);
    d.min(HOURS_PER_DAY - d)
}

/// Mean clock distance of `hours` from `center`.
pub fn mean_absolute_deviation(hours: &[f64], center: f64) -> f64 {
    if hours.is_empty() {
        return 0.0;
    }
    hours.iter().map(|h| distance(*h, center)).sum::<f64>() / hours.len() as f64
}
