//! Integration tests for habit streaks and weekly progress.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use habitflow_core::{
    summarize, CompletionLog, EngineContext, Habit, RecurringItem, RepeatRule, StreakCalculator,
    WeekStart, WeeklyTarget,
};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn target(n: u8) -> WeeklyTarget {
    WeeklyTarget::new(n).unwrap()
}

#[test]
fn five_qualifying_weeks_then_a_gap() {
    // Wednesday; its ISO week starts 2024-03-11
    let today = date(2024, 3, 13);
    let current_week = date(2024, 3, 11);

    let mut log = CompletionLog::new();
    for week in 0..5 {
        let start = current_week - Duration::weeks(week);
        for day in 0..3 {
            log.mark_date(start + Duration::days(day));
        }
    }
    // Week six back has nothing, week seven back qualifies again
    for day in 0..3 {
        log.mark_date(current_week - Duration::weeks(6) + Duration::days(day));
    }

    let calc = StreakCalculator::new();
    assert_eq!(calc.current_streak(target(3), &log, today), 5);
    assert_eq!(calc.longest_streak(target(3), &log), 5);
}

#[test]
fn empty_log_has_no_streak() {
    let calc = StreakCalculator::new();
    assert_eq!(
        calc.current_streak(target(1), &CompletionLog::new(), date(2024, 3, 13)),
        0
    );
}

#[test]
fn summary_is_driven_by_context() {
    let log: CompletionLog = [date(2024, 3, 11), date(2024, 3, 12)].into_iter().collect();
    let habit = Habit::new(
        RecurringItem {
            id: "stretch".into(),
            owner_id: "u1".into(),
            anchor_date: date(2024, 3, 1),
            repeat_rule: RepeatRule::Daily,
            completion_log: log,
            ..Default::default()
        },
        target(3),
    );

    // 2024-03-13 23:30 UTC is already Thursday in UTC+9
    let now = Utc.with_ymd_and_hms(2024, 3, 13, 23, 30, 0).unwrap();
    let tokyo = EngineContext::new(now)
        .with_utc_offset(chrono::FixedOffset::east_opt(9 * 3600).unwrap());

    let summary = summarize(&habit, &tokyo);
    assert_eq!(summary.current_streak, 0);
    assert_eq!(summary.progress.week_start, date(2024, 3, 11));
    assert_eq!(summary.progress.completed, 2);
    assert_eq!(summary.progress.remaining, 1);
    assert_eq!(summary.progress.percent, 66);
    assert!(!summary.progress.is_met());

    let sunday = summarize(&habit, &tokyo.clone().with_week_start(WeekStart::Sunday));
    assert_eq!(sunday.progress.week_start, date(2024, 3, 10));
}

proptest! {
    #[test]
    fn streak_never_exceeds_logged_weeks(
        offsets in proptest::collection::vec(0i64..120, 0..40),
        as_of in 0i64..140,
        n in 1u8..=7,
    ) {
        let base = date(2024, 1, 1);
        let log: CompletionLog = offsets.iter().map(|o| base + Duration::days(*o)).collect();
        let calc = StreakCalculator::new();
        let current = calc.current_streak(target(n), &log, base + Duration::days(as_of));
        let longest = calc.longest_streak(target(n), &log);

        prop_assert!(current <= longest);
        prop_assert!(longest as usize * usize::from(n) <= log.len());
    }
}
