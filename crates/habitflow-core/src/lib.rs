//! # Habitflow Core Library
//!
//! Pure evaluation logic for recurring tasks, weekly habits and items
//! shared between users. The CLI binary is a thin shell over the same
//! library; records are read from a snapshot, never written back.
//!
//! ## Architecture
//!
//! - **Recurrence**: decides whether a rule occurs on a date, and searches
//!   forward for the next occurrence
//! - **Stats**: weekly streaks and current-week progress for habits
//! - **Sharing**: share edges and the per-user visible item resolver
//! - **Storage**: TOML configuration and JSON record snapshots
//!
//! All calls take their "now", week start and timezone explicitly through
//! an [`EngineContext`]; nothing here holds mutable state.
//!
//! ## Key Components
//!
//! - [`occurs_on`]: the occurrence predicate
//! - [`StreakCalculator`]: consecutive qualifying weeks
//! - [`SharedItemResolver`]: de-duplicated visible item lists
//! - [`Config`]: Application configuration management

pub mod agenda;
pub mod context;
pub mod error;
pub mod item;
pub mod recurrence;
pub mod sharing;
pub mod stats;
pub mod storage;

pub use agenda::{due_on, Agenda, DueEntry};
pub use context::{EngineContext, WeekStart};
pub use error::{
    ConfigError, CoreError, RuleDefect, RuleParseError, ShareTransitionError, ValidationError,
};
pub use item::{CompletionLog, CompletionRecord, Habit, RecurringItem, WeeklyTarget};
pub use recurrence::{
    next_occurrence, occurrences_between, occurs_on, RepeatRule, RepeatUnit, WeekdaySet,
};
pub use sharing::{
    backfill_copy_ids, visible_items, BackfillReport, MatchConfidence, Participant,
    ParticipantRole, ShareEdge, ShareStatus, SharedItemResolver, VisibleItem, VisibleItems,
};
pub use stats::{
    summarize, summarize_as_of, HabitSummary, StreakCalculator, WeeklyAdherenceTracker,
    WeeklyProgress,
};
pub use storage::{Config, RecordStore, Snapshot};
