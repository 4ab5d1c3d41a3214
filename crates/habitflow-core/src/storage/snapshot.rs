//! Read-only record snapshots.
//!
//! The engine never talks to the record store directly. Callers hand it a
//! [`RecordStore`]; the JSON [`Snapshot`] exported by the store is the
//! implementation the CLI uses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::item::{Habit, RecurringItem};
use crate::sharing::ShareEdge;

/// Lookup surface over a set of records.
pub trait RecordStore {
    fn items(&self) -> &[RecurringItem];

    fn habits(&self) -> &[Habit];

    fn share_edges(&self) -> &[ShareEdge];

    fn find_item(&self, id: &str) -> Option<&RecurringItem> {
        self.items()
            .iter()
            .find(|item| item.id == id)
            .or_else(|| self.find_habit(id).map(|habit| &habit.item))
    }

    fn find_habit(&self, id: &str) -> Option<&Habit> {
        self.habits().iter().find(|habit| habit.id() == id)
    }

    /// Plain items followed by habit items, as one list.
    fn all_items(&self) -> Vec<RecurringItem> {
        self.items()
            .iter()
            .cloned()
            .chain(self.habits().iter().map(|habit| habit.item.clone()))
            .collect()
    }

    /// Every item (plain or habit) owned by `user_id`.
    fn items_owned_by(&self, user_id: &str) -> Vec<RecurringItem> {
        self.all_items()
            .into_iter()
            .filter(|item| item.owner_id == user_id)
            .collect()
    }
}

/// JSON export of the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub items: Vec<RecurringItem>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub share_edges: Vec<ShareEdge>,
}

impl Snapshot {
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Fails if `json` is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        tracing::debug!(
            items = snapshot.items.len(),
            habits = snapshot.habits.len(),
            share_edges = snapshot.share_edges.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Item by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no plain or habit item has the id.
    pub fn item(&self, id: &str) -> Result<&RecurringItem> {
        self.find_item(id).ok_or_else(|| CoreError::NotFound {
            kind: "item",
            id: id.to_string(),
        })
    }

    /// Habit by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no habit has the id.
    pub fn habit(&self, id: &str) -> Result<&Habit> {
        self.find_habit(id).ok_or_else(|| CoreError::NotFound {
            kind: "habit",
            id: id.to_string(),
        })
    }
}

impl RecordStore for Snapshot {
    fn items(&self) -> &[RecurringItem] {
        &self.items
    }

    fn habits(&self) -> &[Habit] {
        &self.habits
    }

    fn share_edges(&self) -> &[ShareEdge] {
        &self.share_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "items": [
            {"id": "t1", "owner_id": "u1", "anchor_date": "2024-01-01",
             "repeat_rule": {"kind": "daily"}, "created_at": "2024-01-01T00:00:00Z"},
            {"id": "t2", "owner_id": "u2", "anchor_date": "2024-01-01",
             "created_at": "2024-01-01T00:00:00Z"}
        ],
        "habits": [
            {"id": "h1", "owner_id": "u1", "anchor_date": "2024-01-01",
             "created_at": "2024-01-01T00:00:00Z", "weekly_target": 3}
        ]
    }"#;

    #[test]
    fn lookups_cover_items_and_habits() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        assert!(snapshot.share_edges.is_empty());
        assert_eq!(snapshot.item("t1").unwrap().owner_id, "u1");
        assert_eq!(snapshot.item("h1").unwrap().id, "h1");
        assert_eq!(snapshot.habit("h1").unwrap().weekly_target.get(), 3);
        assert!(matches!(
            snapshot.habit("t1"),
            Err(CoreError::NotFound { kind: "habit", .. })
        ));

        let owned: Vec<String> = snapshot
            .items_owned_by("u1")
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(owned, vec!["t1".to_string(), "h1".to_string()]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CoreError::SnapshotRead { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        assert_eq!(Snapshot::load(&path).unwrap().items.len(), 2);
    }
}
