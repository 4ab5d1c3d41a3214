//! "What's due today" view over a set of recurring items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::RecurringItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueEntry {
    pub item_id: String,
    pub title: String,
    /// Whether the log already has a completion for the date
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    pub date: Option<NaiveDate>,
    pub entries: Vec<DueEntry>,
    /// Items skipped because their repeat rule can never occur
    pub malformed: usize,
}

impl Agenda {
    pub fn pending(&self) -> impl Iterator<Item = &DueEntry> {
        self.entries.iter().filter(|entry| !entry.completed)
    }
}

/// Items due on `date`, in input order.
pub fn due_on(items: &[RecurringItem], date: NaiveDate) -> Agenda {
    let mut agenda = Agenda {
        date: Some(date),
        ..Agenda::default()
    };

    for item in items {
        if let Err(err) = item.repeat_rule.validate() {
            tracing::warn!(
                item_id = %item.id,
                rule = %item.repeat_rule,
                error = %err,
                "skipping item with malformed repeat rule"
            );
            agenda.malformed += 1;
            continue;
        }
        if item.occurs_on(date) {
            agenda.entries.push(DueEntry {
                item_id: item.id.clone(),
                title: item.title.clone(),
                completed: item.is_completed_on(date),
            });
        }
    }

    tracing::debug!(%date, due = agenda.entries.len(), malformed = agenda.malformed, "agenda built");
    agenda
}
