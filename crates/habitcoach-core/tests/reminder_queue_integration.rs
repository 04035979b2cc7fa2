//! Integration tests for the reminder queue.
//!
//! Drives the engine through an in-memory snapshot source: filtering of
//! satisfied goals, floor padding, cursor advance across refreshes, and
//! refreshes that fail or are cancelled mid-fetch.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use habitcoach_core::reminders::Dismissal;
use habitcoach_core::{
    DailyLog, DaySnapshot, Habit, HabitCategory, HabitCompletion, HabitFrequency, RefreshError,
    ReminderAction, ReminderQueueEngine, SnapshotError, SnapshotSource, StandardReminderGenerator,
};
use std::sync::Mutex;
use std::time::Duration;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, hour, 0, 0).unwrap()
}

fn habit(id: &str, title: &str) -> Habit {
    Habit {
        id: id.to_string(),
        title: title.to_string(),
        category: HabitCategory::Fitness,
        frequency: HabitFrequency::Daily,
        target_value: 1.0,
        unit: "times".to_string(),
        is_active: true,
    }
}

fn with_water(ml: f64) -> DaySnapshot {
    let mut snapshot = DaySnapshot::empty("u1", date());
    snapshot.daily_log = Some(DailyLog { date: date(), water_ml: ml, ..Default::default() });
    snapshot
}

fn engine() -> ReminderQueueEngine<StandardReminderGenerator> {
    ReminderQueueEngine::new("u1", StandardReminderGenerator::new(utc()), utc())
}

fn ids(engine: &ReminderQueueEngine<StandardReminderGenerator>) -> Vec<String> {
    engine.queue().active().iter().map(|r| r.id.clone()).collect()
}

/// Serves whatever snapshot (or error) it currently holds.
struct MemorySource {
    next: Mutex<Result<DaySnapshot, SnapshotError>>,
    delay: Option<Duration>,
}

impl MemorySource {
    fn new(snapshot: DaySnapshot) -> Self {
        Self { next: Mutex::new(Ok(snapshot)), delay: None }
    }

    fn set(&self, next: Result<DaySnapshot, SnapshotError>) {
        *self.next.lock().unwrap() = next;
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn fetch_snapshot(&self, _user_id: &str, _date: NaiveDate) -> Result<DaySnapshot, SnapshotError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next.lock().unwrap().clone()
    }
}

#[test]
fn test_water_goal_met_excludes_water_reminder() {
    let mut engine = engine();
    engine.refresh(&with_water(1920.0), at(12));
    assert!(engine
        .queue()
        .active()
        .iter()
        .all(|r| r.action != ReminderAction::LogWater));
    assert_eq!(engine.queue().len(), 7);

    let mut engine = self::engine();
    engine.refresh(&with_water(1000.0), at(12));
    assert!(ids(&engine).contains(&"2024-01-10:water".to_string()));
}

#[test]
fn test_floor_is_max_of_seven_and_filtered_count() {
    let mut quiet = engine();
    quiet.refresh(&DaySnapshot::empty("u1", date()), at(3));
    assert_eq!(quiet.queue().len(), 7);

    let mut busy_snapshot = DaySnapshot::empty("u1", date());
    busy_snapshot.habits = (0..9).map(|i| habit(&format!("h{i}"), &format!("Habit {i}"))).collect();
    let mut busy = engine();
    busy.refresh(&busy_snapshot, at(3));
    assert_eq!(busy.queue().len(), 9);
}

#[test]
fn test_completed_reminder_never_returns_after_refresh() {
    let mut engine = engine();
    let snapshot = with_water(0.0);
    engine.refresh(&snapshot, at(12));

    let first = engine.current().unwrap().id.clone();
    let second = engine.queue().active()[1].id.clone();
    let before = engine.queue().len();

    let removed = engine.complete_current().unwrap();
    assert_eq!(removed.id, first);
    assert_eq!(engine.queue().len(), before - 1);
    assert_eq!(engine.current().unwrap().id, second);

    engine.refresh(&snapshot, at(13));
    assert!(!ids(&engine).contains(&first));
    assert_eq!(engine.queue().dismissed().get(&first), Some(&Dismissal::Completed));
}

#[test]
fn test_refresh_keeps_cursor_on_same_reminder() {
    let mut engine = engine();
    let snapshot = with_water(0.0);
    engine.refresh(&snapshot, at(12));

    engine.queue_mut().navigate_to(2).unwrap();
    let current = engine.current().unwrap().id.clone();

    engine.refresh(&snapshot, at(12));
    assert_eq!(engine.current().unwrap().id, current);
}

#[test]
fn test_logging_goal_advances_current() {
    let mut snapshot = DaySnapshot::empty("u1", date());
    snapshot.habits = vec![habit("run", "Run")];
    let mut engine = engine();
    engine.refresh(&snapshot, at(3));
    assert_eq!(engine.current().unwrap().id, "2024-01-10:habit:run");

    let mut fresh = snapshot.clone();
    fresh.completions_today.push(HabitCompletion {
        habit_id: "run".to_string(),
        completed_at: at(3),
        value: 1.0,
        notes: None,
    });
    assert!(engine.check_and_advance_if_completed("2024-01-10:habit:run", &fresh, at(3)));
    assert!(!ids(&engine).contains(&"2024-01-10:habit:run".to_string()));
}

#[test]
fn test_next_day_starts_a_new_session() {
    let mut engine = engine();
    engine.refresh(&DaySnapshot::empty("u1", date()), at(3));
    let session = engine.queue().session_id();
    engine.skip_current();
    assert_eq!(engine.queue().dismissed().len(), 1);

    let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
    engine.refresh(&DaySnapshot::empty("u1", tomorrow), Utc.with_ymd_and_hms(2024, 1, 11, 3, 0, 0).unwrap());
    assert!(engine.queue().dismissed().is_empty());
    assert_ne!(engine.queue().session_id(), session);
    assert_eq!(engine.queue().len(), 7);
}

#[test]
fn test_skipped_water_is_not_prompted_again() {
    let mut engine = engine();
    let snapshot = with_water(0.0);
    engine.refresh(&snapshot, at(12));

    let water = engine.queue().active().iter().position(|r| r.id == "2024-01-10:water").unwrap();
    engine.queue_mut().navigate_to(water).unwrap();
    engine.skip_current();

    engine.refresh(&snapshot, at(13));
    let water_ids: Vec<_> = engine
        .queue()
        .active()
        .iter()
        .filter(|r| r.action == ReminderAction::LogWater)
        .map(|r| r.id.clone())
        .collect();
    assert!(water_ids.is_empty(), "{water_ids:?}");
}

#[test]
fn test_stale_snapshot_does_not_reset_today() {
    let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
    let tomorrow_at = Utc.with_ymd_and_hms(2024, 1, 11, 3, 0, 0).unwrap();
    let mut engine = engine();

    engine.refresh(&DaySnapshot::empty("u1", tomorrow), tomorrow_at);
    let completed = engine.complete_current().unwrap().id;

    engine.refresh(&DaySnapshot::empty("u1", date()), at(23));
    engine.refresh(&DaySnapshot::empty("u1", tomorrow), tomorrow_at);

    assert!(!ids(&engine).contains(&completed));
    assert_eq!(engine.queue().dismissed().get(&completed), Some(&Dismissal::Completed));
    assert_eq!(engine.queue().date(), Some(tomorrow));
}

#[tokio::test]
async fn test_refresh_from_source() {
    habitcoach_core::logging::init_test();
    let source = MemorySource::new(with_water(0.0));
    let mut engine = engine();

    let count = engine.refresh_from(&source, at(12)).await.unwrap();
    assert_eq!(count, engine.queue().len());
    assert!(ids(&engine).contains(&"2024-01-10:water".to_string()));

    source.set(Ok(with_water(2500.0)));
    engine.refresh_from(&source, at(12)).await.unwrap();
    assert!(!ids(&engine).contains(&"2024-01-10:water".to_string()));
}

#[tokio::test]
async fn test_failed_refresh_retains_queue() {
    let source = MemorySource::new(with_water(0.0));
    let mut engine = engine();
    engine.refresh_from(&source, at(12)).await.unwrap();
    engine.queue_mut().navigate_to(1).unwrap();
    let before = ids(&engine);

    let failure = SnapshotError::Unavailable {
        user_id: "u1".to_string(),
        message: "store offline".to_string(),
    };
    source.set(Err(failure.clone()));

    let err = engine.refresh_from(&source, at(13)).await.unwrap_err();
    assert_eq!(err, RefreshError::Snapshot(failure));
    assert_eq!(ids(&engine), before);
    assert_eq!(engine.queue().current_index(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_refresh_leaves_queue_untouched() {
    let mut engine = engine();
    engine.refresh(&with_water(0.0), at(12));
    let before = ids(&engine);

    let slow = MemorySource {
        next: Mutex::new(Ok(with_water(5000.0))),
        delay: Some(Duration::from_secs(60)),
    };
    let outcome = tokio::time::timeout(Duration::from_millis(10), engine.refresh_from(&slow, at(12))).await;

    assert!(outcome.is_err());
    assert_eq!(ids(&engine), before);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_after_write_waits_settle_delay() {
    let source = MemorySource::new(with_water(0.0));
    let mut engine = engine();

    let started = tokio::time::Instant::now();
    engine.refresh_after_write(&source, at(12)).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert!(!engine.queue().is_empty());
}
