//! Integration tests for schedule recommendations.
//!
//! Builds circadian profiles from sleep logs and checks how they move the
//! recommended hours, probabilities and reasoning.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use habitcoach_core::{
    EnvironmentalContext, Habit, HabitCategory, HabitFrequency, HealthEntry, HealthLog,
    ScheduleRecommender, SleepLog, Weather,
};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn habit(id: &str, title: &str, category: HabitCategory) -> Habit {
    Habit {
        id: id.to_string(),
        title: title.to_string(),
        category,
        frequency: HabitFrequency::Daily,
        target_value: 1.0,
        unit: "times".to_string(),
        is_active: true,
    }
}

fn night(day: u32, bed: &str, wake: &str, hours: f64, quality: u8) -> HealthLog {
    HealthLog {
        id: format!("sleep-{day}"),
        logged_at: Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap(),
        entry: HealthEntry::Sleep(SleepLog {
            bed_time: bed.to_string(),
            wake_time: wake.to_string(),
            duration_hours: hours,
            quality,
        }),
    }
}

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

#[test]
fn test_late_sleeper_gets_later_workout() {
    let habits = vec![habit("swim", "Swim", HabitCategory::Fitness)];
    let recommender = ScheduleRecommender::new(utc());

    let typical = recommender.recommend(&habits, &[], None, as_of());
    assert_eq!(typical[0].recommended_time, at(8));

    let late: Vec<_> = (1..=14).map(|d| night(d, "01:00", "09:00", 8.0, 8)).collect();
    let shifted = recommender.recommend(&habits, &late, None, as_of());
    assert_eq!(shifted[0].recommended_time, at(10));
    assert!(shifted[0]
        .reasoning
        .iter()
        .all(|r| !r.contains("typical sleep schedule")));
}

#[test]
fn test_sunny_weather_helps_outdoor_habits_only() {
    let habits = vec![
        habit("walk", "Evening walk", HabitCategory::MentalHealth),
        habit("read", "Read", HabitCategory::MentalHealth),
    ];
    let sunny = EnvironmentalContext { weather: Weather::Sunny, temperature_c: Some(21.0) };
    let recs = ScheduleRecommender::new(utc()).recommend(&habits, &[], Some(&sunny), as_of());

    let walk = recs.iter().find(|r| r.habit_id == "walk").unwrap();
    let read = recs.iter().find(|r| r.habit_id == "read").unwrap();
    assert!((walk.success_probability - read.success_probability - 0.05).abs() < 1e-9);
    assert!(walk.reasoning.iter().any(|r| r.contains("weather")));
    assert_eq!(recs[0].habit_id, "walk");
}

#[test]
fn test_short_poor_sleep_lowers_probability() {
    let habits = vec![habit("swim", "Swim", HabitCategory::Fitness)];
    let recommender = ScheduleRecommender::new(utc());
    let rested: Vec<_> = (1..=7).map(|d| night(d + 7, "22:30", "07:00", 8.5, 8)).collect();
    let tired: Vec<_> = (1..=7).map(|d| night(d + 7, "22:30", "07:00", 5.0, 3)).collect();

    let good = &recommender.recommend(&habits, &rested, None, as_of())[0];
    let poor = &recommender.recommend(&habits, &tired, None, as_of())[0];
    assert!(good.success_probability > poor.success_probability);
    assert!(good.energy_level > poor.energy_level);
}

#[test]
fn test_profile_chart_renders_from_logs() {
    let logs: Vec<_> = (1..=5).map(|d| night(d, "23:00", "07:00", 8.0, 7)).collect();
    let recommender = ScheduleRecommender::new(utc());
    let profile = recommender.analyzer().compute_profile(&logs, as_of());

    assert_eq!(profile.sleep.sample_count, 5);
    assert_eq!(profile.windows.len(), 24);
    let chart = profile.render_ascii_chart();
    assert_eq!(chart.lines().filter(|l| l.contains(":00 ")).count(), 24);
}
