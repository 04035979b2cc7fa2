//! Property tests for streak transitions over arbitrary log sequences.

use chrono::{Duration, NaiveDate};
use habitcoach_core::{Streak, StreakCalculator, StreakChange};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Day offsets from the base date, in log order (not necessarily sorted).
fn arb_offsets() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..90, 1..60)
}

proptest! {
    #[test]
    fn longest_never_decreases_and_bounds_current(offsets in arb_offsets()) {
        let calc = StreakCalculator::new();
        let mut streak = Streak::new("u1");

        for offset in offsets {
            let before = streak.clone();
            streak = calc.apply(&streak, base() + Duration::days(offset)).streak;

            prop_assert!(streak.longest_streak >= before.longest_streak);
            prop_assert!(streak.longest_streak >= streak.current_streak);
            prop_assert!(streak.total_logs >= before.total_logs);
            prop_assert!(streak.last_log_date >= before.last_log_date);
        }
    }

    #[test]
    fn same_day_relog_is_idempotent(offsets in arb_offsets()) {
        let calc = StreakCalculator::new();
        let streak = offsets
            .iter()
            .fold(Streak::new("u1"), |acc, o| calc.apply(&acc, base() + Duration::days(*o)).streak);
        let last = streak.last_log_date.unwrap();

        let update = calc.apply(&streak, last);
        prop_assert_eq!(update.change, StreakChange::SameDay);
        prop_assert_eq!(update.streak, streak);
    }

    #[test]
    fn out_of_order_logs_leave_streak_untouched(offsets in arb_offsets(), back in 1i64..30) {
        let calc = StreakCalculator::new();
        let streak = offsets
            .iter()
            .fold(Streak::new("u1"), |acc, o| calc.apply(&acc, base() + Duration::days(*o)).streak);
        let earlier = streak.last_log_date.unwrap() - Duration::days(back);

        let update = calc.apply(&streak, earlier);
        prop_assert_eq!(update.change, StreakChange::OutOfOrder);
        prop_assert_eq!(update.streak, streak);
    }

    #[test]
    fn rebuild_matches_sorted_replay(offsets in arb_offsets()) {
        let calc = StreakCalculator::new();
        let mut dates: Vec<NaiveDate> = offsets.iter().map(|o| base() + Duration::days(*o)).collect();

        let rebuilt = calc.rebuild_from_dates("u1", dates.clone());

        dates.sort_unstable();
        let replayed = dates
            .iter()
            .fold(Streak::new("u1"), |acc, d| calc.apply(&acc, *d).streak);

        prop_assert_eq!(rebuilt.current_streak, replayed.current_streak);
        prop_assert_eq!(rebuilt.longest_streak, replayed.longest_streak);
        prop_assert_eq!(rebuilt.last_log_date, replayed.last_log_date);
    }
}

#[test]
fn test_next_day_extends_and_gap_resets() {
    let calc = StreakCalculator::new();
    let streak = Streak {
        uid: "u1".to_string(),
        current_streak: 3,
        longest_streak: 5,
        last_log_date: NaiveDate::from_ymd_opt(2024, 1, 10),
        streak_start_date: NaiveDate::from_ymd_opt(2024, 1, 8),
        total_logs: 12,
    };

    let next = calc.calculate_updated_streak(&streak, "2024-01-11").unwrap();
    assert_eq!(next.change, StreakChange::Extended);
    assert_eq!(next.streak.current_streak, 4);
    assert_eq!(next.streak.longest_streak, 5);

    let gap = calc.calculate_updated_streak(&streak, "2024-01-12").unwrap();
    assert_eq!(gap.change, StreakChange::Reset);
    assert_eq!(gap.streak.current_streak, 1);
    assert_eq!(gap.streak.longest_streak, 5);
    assert_eq!(gap.streak.streak_start_date, NaiveDate::from_ymd_opt(2024, 1, 12));
}

#[test]
fn test_long_gap_keeps_longest() {
    let calc = StreakCalculator::new();
    let streak = Streak {
        uid: "u1".to_string(),
        current_streak: 5,
        longest_streak: 7,
        last_log_date: NaiveDate::from_ymd_opt(2024, 1, 5),
        streak_start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        total_logs: 20,
    };

    let update = calc.calculate_updated_streak(&streak, "2024-01-10").unwrap();
    assert_eq!(update.streak.current_streak, 1);
    assert_eq!(update.streak.longest_streak, 7);
    assert_eq!(update.streak.streak_start_date, NaiveDate::from_ymd_opt(2024, 1, 10));
    assert_eq!(update.streak.total_logs, 21);
}

#[test]
fn test_malformed_date_is_rejected() {
    let calc = StreakCalculator::new();
    assert!(calc.calculate_updated_streak(&Streak::new("u1"), "2024-02-30").is_err());
}
