//! Recurring items and habits.
//!
//! Records come straight from the record store. The repeat rule is treated
//! as fixed once an item exists; only the completion log changes.

mod completion;

pub use completion::{CompletionLog, CompletionRecord};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::recurrence::{self, RepeatRule};

/// A task or habit that repeats from an anchor date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub title: String,
    pub anchor_date: NaiveDate,
    #[serde(default)]
    pub repeat_rule: RepeatRule,
    #[serde(default)]
    pub repeat_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub completion_log: CompletionLog,
    pub created_at: DateTime<Utc>,
}

impl RecurringItem {
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        anchor_date: NaiveDate,
        repeat_rule: RepeatRule,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            title: String::new(),
            anchor_date,
            repeat_rule,
            repeat_end_date: None,
            completion_log: CompletionLog::new(),
            created_at,
        }
    }

    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        recurrence::occurs_on(&self.repeat_rule, self.anchor_date, date, self.repeat_end_date)
    }

    /// Next due date strictly after `after`.
    ///
    /// A malformed rule is logged and yields `None`.
    pub fn next_occurrence(&self, after: NaiveDate) -> Option<NaiveDate> {
        if let Err(err) = self.repeat_rule.validate() {
            tracing::warn!(
                item_id = %self.id,
                rule = %self.repeat_rule,
                error = %err,
                "recurring item has a malformed repeat rule"
            );
            return None;
        }
        recurrence::next_occurrence(
            &self.repeat_rule,
            self.anchor_date,
            after,
            self.repeat_end_date,
        )
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_log.contains(date)
    }
}

/// Number of completions per week a habit needs, always within 1..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeeklyTarget(u8);

impl WeeklyTarget {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::WeeklyTargetOutOfRange(value))
        }
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u8> for WeeklyTarget {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeeklyTarget> for u8 {
    fn from(target: WeeklyTarget) -> Self {
        target.0
    }
}

impl Default for WeeklyTarget {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// A recurring item tracked for weekly adherence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    #[serde(flatten)]
    pub item: RecurringItem,
    pub weekly_target: WeeklyTarget,
}

impl Habit {
    pub fn new(item: RecurringItem, weekly_target: WeeklyTarget) -> Self {
        Self {
            item,
            weekly_target,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }
}
