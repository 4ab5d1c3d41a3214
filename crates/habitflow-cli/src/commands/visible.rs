use std::path::Path;

use habitflow_core::{RecordStore, SharedItemResolver};

use super::{engine_context, load_snapshot, print_json, CommandResult};

pub fn run(snapshot: Option<&Path>, user_id: &str) -> CommandResult {
    let snapshot = load_snapshot(snapshot)?;
    let resolver = SharedItemResolver::from_context(&engine_context()?);
    let report = resolver.resolve(
        &snapshot.items_owned_by(user_id),
        snapshot.share_edges(),
        user_id,
    );

    if report.is_degraded() {
        tracing::info!(
            user_id,
            unresolved = report.unresolved_edges,
            invalid = report.invalid_edges,
            "visible list built from incomplete share data"
        );
    }
    print_json(&report)
}
