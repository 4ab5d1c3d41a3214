use std::path::Path;

use chrono::NaiveDate;
use habitflow_core::summarize_as_of;

use super::{engine_context, load_snapshot, print_json, CommandResult};

pub fn run(snapshot: Option<&Path>, habit_id: &str, as_of: Option<NaiveDate>) -> CommandResult {
    let snapshot = load_snapshot(snapshot)?;
    let habit = snapshot.habit(habit_id)?;
    let ctx = engine_context()?;
    let as_of = as_of.unwrap_or_else(|| ctx.today());

    print_json(&summarize_as_of(habit, &ctx, as_of))
}
