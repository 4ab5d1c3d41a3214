//! Current-week progress toward a habit's weekly target.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::context::{EngineContext, WeekStart};
use crate::item::{CompletionLog, WeeklyTarget};

/// Progress for the week containing a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    /// First day of the week window
    pub week_start: NaiveDate,
    /// Last day of the week window (inclusive)
    pub week_end: NaiveDate,
    /// Completions logged inside the window
    pub completed: u32,
    /// Completions required for the week to count
    pub target: u32,
    /// `min(100, 100 * completed / target)`, rounded down
    pub percent: u32,
    /// Completions still needed this week
    pub remaining: u32,
}

impl WeeklyProgress {
    pub fn is_met(&self) -> bool {
        self.completed >= self.target
    }
}

/// Tracker for weekly adherence progress.
///
/// Uses the same week windows as [`super::StreakCalculator`] when built
/// from the same [`EngineContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyAdherenceTracker {
    pub week_start: WeekStart,
}

impl WeeklyAdherenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_week_start(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    pub fn from_context(ctx: &EngineContext) -> Self {
        Self::with_week_start(ctx.week_start)
    }

    pub fn weekly_progress(
        &self,
        target: WeeklyTarget,
        log: &CompletionLog,
        today: NaiveDate,
    ) -> WeeklyProgress {
        let (week_start, week_end) = self.week_start.window(today);
        let completed = log.count_between(week_start, week_end);
        let target = target.get();
        let percent = (completed.saturating_mul(100) / target).min(100);

        WeeklyProgress {
            week_start,
            week_end,
            completed,
            target,
            percent,
            remaining: target.saturating_sub(completed),
        }
    }
}
