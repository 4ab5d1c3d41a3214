use std::path::Path;

use chrono::NaiveDate;
use habitflow_core::{due_on, RecordStore};

use super::{engine_context, load_snapshot, print_json, CommandResult};

pub fn run(snapshot: Option<&Path>, date: Option<NaiveDate>, user: Option<&str>) -> CommandResult {
    let snapshot = load_snapshot(snapshot)?;
    let date = match date {
        Some(date) => date,
        None => engine_context()?.today(),
    };

    let items = match user {
        Some(user) => snapshot.items_owned_by(user),
        None => snapshot.all_items(),
    };
    print_json(&due_on(&items, date))
}
