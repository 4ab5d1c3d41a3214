pub mod backfill;
pub mod config;
pub mod due;
pub mod next;
pub mod rule;
pub mod streak;
pub mod visible;

use std::error::Error;
use std::path::Path;

use chrono::Utc;
use habitflow_core::{Config, EngineContext, Snapshot};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn Error>>;

pub(crate) fn load_snapshot(path: Option<&Path>) -> Result<Snapshot, Box<dyn Error>> {
    let path = path.ok_or("this command needs --snapshot <FILE>")?;
    Ok(Snapshot::load(path)?)
}

/// Context for an evaluation run starting now.
pub(crate) fn engine_context() -> Result<EngineContext, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(config.engine_context(Utc::now())?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
