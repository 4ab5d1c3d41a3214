use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use habitflow_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "habitflow-cli", version, about = "Habitflow CLI")]
struct Cli {
    /// JSON snapshot exported by the record store
    #[arg(long, global = true, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Items due on a date
    Due {
        /// Defaults to today in the configured timezone
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only items owned by this user
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,
    },
    /// Next occurrence of an item
    Next {
        item_id: String,
        /// Search strictly after this date (default: today)
        #[arg(long)]
        after: Option<NaiveDate>,
    },
    /// Streak and weekly progress for a habit
    Streak {
        habit_id: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// A user's de-duplicated item list
    Visible { user_id: String },
    /// Fill missing copy references on legacy share edges
    Backfill,
    /// Repeat rule tools
    Rule {
        #[command(subcommand)]
        action: commands::rule::RuleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(&Config::load_or_default().logging.level);

    let snapshot = cli.snapshot.as_deref();
    let result = match cli.command {
        Commands::Due { date, user } => commands::due::run(snapshot, date, user.as_deref()),
        Commands::Next { item_id, after } => commands::next::run(snapshot, &item_id, after),
        Commands::Streak { habit_id, as_of } => commands::streak::run(snapshot, &habit_id, as_of),
        Commands::Visible { user_id } => commands::visible::run(snapshot, &user_id),
        Commands::Backfill => commands::backfill::run(snapshot),
        Commands::Rule { action } => commands::rule::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
