//! Explicit evaluation context.
//!
//! Everything that used to be ambient (the "last refreshed" instant, the
//! reference timezone, which day a week starts on) travels in an
//! [`EngineContext`] value handed to each call. The core keeps no
//! module-level mutable state.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Default distance allowed between a legacy share edge and its guessed copy.
pub const DEFAULT_LEGACY_MATCH_WINDOW_HOURS: i64 = 72;

/// First day of the week used for every weekly window.
///
/// Streaks and weekly progress must agree on this; both read it from the
/// same context. `Sunday` exists only to keep older deployments stable while
/// their data is migrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// First day of the week containing `date`.
    ///
    /// Clamped to the first representable date at the bottom of the calendar.
    pub fn week_of(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        date
            .checked_sub_signed(Duration::days(i64::from(offset)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Inclusive `[start, end]` window of the week containing `date`.
    ///
    /// Both ends are clamped to the representable calendar.
    pub fn window(self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = self.week_of(date);
        let end = start
            .checked_add_signed(Duration::days(6))
            .unwrap_or(NaiveDate::MAX);
        (start, end)
    }
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekStart::Monday => f.write_str("monday"),
            WeekStart::Sunday => f.write_str("sunday"),
        }
    }
}

/// Snapshot-wide evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContext {
    pub week_start: WeekStart,
    /// Reference timezone all calendar dates are read in.
    pub utc_offset: FixedOffset,
    pub legacy_match_window: Duration,
    /// When the snapshot was taken; "today" is derived from this.
    pub refreshed_at: DateTime<Utc>,
}

impl EngineContext {
    /// Context with default settings, refreshed at `refreshed_at`.
    pub fn new(refreshed_at: DateTime<Utc>) -> Self {
        Self {
            week_start: WeekStart::default(),
            utc_offset: Utc.fix(),
            legacy_match_window: Duration::hours(DEFAULT_LEGACY_MATCH_WINDOW_HOURS),
            refreshed_at,
        }
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_legacy_match_window(mut self, window: Duration) -> Self {
        self.legacy_match_window = window;
        self
    }

    /// Same settings, new refresh instant.
    pub fn refreshed(&self, at: DateTime<Utc>) -> Self {
        Self {
            refreshed_at: at,
            ..self.clone()
        }
    }

    /// Calendar date of `instant` in the reference timezone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// Calendar date of the refresh instant.
    pub fn today(&self) -> NaiveDate {
        self.date_of(self.refreshed_at)
    }
}
