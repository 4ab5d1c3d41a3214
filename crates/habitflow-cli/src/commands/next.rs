use std::path::Path;

use chrono::NaiveDate;
use serde_json::json;

use super::{engine_context, load_snapshot, print_json, CommandResult};

pub fn run(snapshot: Option<&Path>, item_id: &str, after: Option<NaiveDate>) -> CommandResult {
    let snapshot = load_snapshot(snapshot)?;
    let item = snapshot.item(item_id)?;
    let after = match after {
        Some(after) => after,
        None => engine_context()?.today(),
    };

    print_json(&json!({
        "item_id": item.id,
        "rule": item.repeat_rule.to_string(),
        "after": after,
        "next": item.next_occurrence(after),
    }))
}
