//! Per-date completion records.
//!
//! A log holds at most one record per calendar date and iterates in date
//! order. Older records stored a bare list of dates; both shapes load.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What was recorded when an occurrence was marked done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CompletionRecord {
    pub fn at(completed_at: DateTime<Utc>) -> Self {
        Self {
            completed_at: Some(completed_at),
            note: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLog {
    Records(BTreeMap<NaiveDate, CompletionRecord>),
    Dates(Vec<NaiveDate>),
}

impl From<StoredLog> for CompletionLog {
    fn from(stored: StoredLog) -> Self {
        match stored {
            StoredLog::Records(entries) => CompletionLog { entries },
            StoredLog::Dates(dates) => dates.into_iter().collect(),
        }
    }
}

impl From<CompletionLog> for BTreeMap<NaiveDate, CompletionRecord> {
    fn from(log: CompletionLog) -> Self {
        log.entries
    }
}

/// Ordered mapping from calendar date to completion record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLog", into = "BTreeMap<NaiveDate, CompletionRecord>")]
pub struct CompletionLog {
    entries: BTreeMap<NaiveDate, CompletionRecord>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion for `date`.
    ///
    /// Returns `true` if the date was not yet marked. Marking an already
    /// marked date replaces its record.
    pub fn mark(&mut self, date: NaiveDate, record: CompletionRecord) -> bool {
        self.entries.insert(date, record).is_none()
    }

    pub fn mark_date(&mut self, date: NaiveDate) -> bool {
        self.mark(date, CompletionRecord::default())
    }

    pub fn unmark(&mut self, date: NaiveDate) -> Option<CompletionRecord> {
        self.entries.remove(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CompletionRecord> {
        self.entries.get(&date)
    }

    /// Number of marked dates in the inclusive range `[start, end]`.
    pub fn count_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        let count = self.entries.range(start..=end).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &CompletionRecord)> + '_ {
        self.entries.iter().map(|(date, record)| (*date, record))
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<NaiveDate> for CompletionLog {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|date| (date, CompletionRecord::default()))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mark_is_unique_per_date() {
        let mut log = CompletionLog::new();
        assert!(log.mark_date(date(2024, 1, 2)));
        assert!(!log.mark_date(date(2024, 1, 2)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn iterates_in_date_order() {
        let log: CompletionLog = [date(2024, 3, 1), date(2024, 1, 1), date(2024, 2, 1)]
            .into_iter()
            .collect();
        let dates: Vec<_> = log.dates().collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
        assert_eq!(log.first(), Some(date(2024, 1, 1)));
        assert_eq!(log.last(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn count_between_is_inclusive() {
        let log: CompletionLog = (1..=10).map(|d| date(2024, 1, d)).collect();
        assert_eq!(log.count_between(date(2024, 1, 3), date(2024, 1, 5)), 3);
        assert_eq!(log.count_between(date(2024, 1, 5), date(2024, 1, 3)), 0);
    }

    #[test]
    fn unmark_returns_record() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();
        let mut log = CompletionLog::new();
        log.mark(date(2024, 1, 2), CompletionRecord::at(at));
        let removed = log.unmark(date(2024, 1, 2)).unwrap();
        assert_eq!(removed.completed_at, Some(at));
        assert!(log.is_empty());
    }

    #[test]
    fn serializes_as_date_keyed_object() {
        let mut log = CompletionLog::new();
        log.mark(
            date(2024, 1, 2),
            CompletionRecord {
                completed_at: None,
                note: Some("felt good".into()),
            },
        );
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json, serde_json::json!({ "2024-01-02": { "note": "felt good" } }));

        let back: CompletionLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn loads_legacy_date_list() {
        let log: CompletionLog =
            serde_json::from_str(r#"["2024-01-03", "2024-01-01", "2024-01-03"]"#).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.contains(date(2024, 1, 1)));
    }
}
