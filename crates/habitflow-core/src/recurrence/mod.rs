//! Recurrence rules and occurrence evaluation.
//!
//! Dates are plain calendar days in the reference timezone; time of day
//! never affects whether an item is due.

mod evaluator;
mod rule;

pub use evaluator::{next_occurrence, occurrences_between, occurs_on};
pub use rule::{RepeatRule, RepeatUnit, WeekdaySet};
