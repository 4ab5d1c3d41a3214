//! Statistics module for Habitflow
//!
//! Weekly adherence for habits: the streak badge (consecutive qualifying
//! weeks) and the current-week progress bar. Both read their week windows
//! from the same [`EngineContext`] so they never disagree on where a week
//! begins.

mod adherence;
mod streak;

pub use adherence::{WeeklyAdherenceTracker, WeeklyProgress};
pub use streak::StreakCalculator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::context::EngineContext;
use crate::item::Habit;

/// Everything the streak badge and progress bar need for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub progress: WeeklyProgress,
}

/// Summarize `habit` as of the context's refresh date.
pub fn summarize(habit: &Habit, ctx: &EngineContext) -> HabitSummary {
    summarize_as_of(habit, ctx, ctx.today())
}

/// Summarize `habit` as if `today` were the current date.
pub fn summarize_as_of(habit: &Habit, ctx: &EngineContext, today: NaiveDate) -> HabitSummary {
    let log = &habit.item.completion_log;
    let streaks = StreakCalculator::from_context(ctx);

    let summary = HabitSummary {
        habit_id: habit.item.id.clone(),
        current_streak: streaks.current_streak(habit.weekly_target, log, today),
        longest_streak: streaks.longest_streak(habit.weekly_target, log),
        progress: WeeklyAdherenceTracker::from_context(ctx).weekly_progress(
            habit.weekly_target,
            log,
            today,
        ),
    };

    tracing::debug!(
        habit_id = %summary.habit_id,
        current_streak = summary.current_streak,
        completed = summary.progress.completed,
        target = summary.progress.target,
        "habit summarized"
    );
    summary
}
