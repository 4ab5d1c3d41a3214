//! Consecutive-week adherence streaks.
//!
//! A week qualifies when the completion log has at least `weekly_target`
//! entries inside it. The current streak counts qualifying weeks backwards
//! from the week containing the as-of date and is zero as soon as that week
//! itself falls short.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::context::{EngineContext, WeekStart};
use crate::item::{CompletionLog, WeeklyTarget};

/// Calculator for weekly adherence streaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator {
    pub week_start: WeekStart,
}

impl StreakCalculator {
    /// Create a calculator using ISO (Monday-first) weeks
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_week_start(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    pub fn from_context(ctx: &EngineContext) -> Self {
        Self::with_week_start(ctx.week_start)
    }

    /// Qualifying consecutive weeks ending with the week containing `as_of`.
    ///
    /// Stops at the first week under target. Weeks before the earliest
    /// logged date cannot qualify, which bounds the walk.
    pub fn current_streak(
        &self,
        target: WeeklyTarget,
        log: &CompletionLog,
        as_of: NaiveDate,
    ) -> u32 {
        let Some(earliest) = log.first() else {
            return 0;
        };

        let mut streak = 0;
        let mut week = self.week_start.week_of(as_of);
        loop {
            let (_, week_end) = self.week_start.window(week);
            if week_end < earliest || log.count_between(week, week_end) < target.get() {
                break;
            }
            streak += 1;
            match week.checked_sub_signed(Duration::days(7)) {
                Some(previous) => week = previous,
                None => break,
            }
        }
        streak
    }

    /// Longest run of consecutive qualifying weeks anywhere in the log.
    pub fn longest_streak(&self, target: WeeklyTarget, log: &CompletionLog) -> u32 {
        let mut per_week: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for date in log.dates() {
            *per_week.entry(self.week_start.week_of(date)).or_insert(0) += 1;
        }

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for (week, count) in per_week {
            if count < target.get() {
                run = 0;
                previous = None;
                continue;
            }
            run = match previous {
                Some(prev) if week - prev == Duration::days(7) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(week);
        }
        longest
    }
}
