use std::path::Path;

use habitflow_core::{backfill_copy_ids, RecordStore};
use serde_json::json;

use super::{engine_context, load_snapshot, print_json, CommandResult};

/// Prints the report and the updated edges; the snapshot file is left as is.
pub fn run(snapshot: Option<&Path>) -> CommandResult {
    let snapshot = load_snapshot(snapshot)?;
    let ctx = engine_context()?;

    let mut edges = snapshot.share_edges().to_vec();
    let report = backfill_copy_ids(&mut edges, &snapshot.all_items(), ctx.legacy_match_window);

    print_json(&json!({
        "report": report,
        "share_edges": edges,
    }))
}
