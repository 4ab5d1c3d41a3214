use chrono::NaiveDate;
use clap::Subcommand;
use habitflow_core::{next_occurrence, RepeatRule};
use serde_json::json;

use super::{print_json, CommandResult};

#[derive(Subcommand)]
pub enum RuleAction {
    /// Parse and validate a rule label, e.g. "every:2:weeks:mon,thu"
    Check {
        label: String,
        /// Anchor date the rule is evaluated from
        #[arg(long)]
        anchor: NaiveDate,
        /// How many upcoming occurrences to list
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

pub fn run(action: RuleAction) -> CommandResult {
    match action {
        RuleAction::Check {
            label,
            anchor,
            count,
        } => {
            let rule = RepeatRule::parse(&label)?;
            let error = rule.validate().err().map(|e| e.to_string());

            let mut upcoming = Vec::with_capacity(count);
            let mut cursor = anchor.pred_opt();
            while upcoming.len() < count {
                let Some(after) = cursor else { break };
                match next_occurrence(&rule, anchor, after, None) {
                    Some(date) => {
                        upcoming.push(date);
                        cursor = Some(date);
                    }
                    None => break,
                }
            }

            print_json(&json!({
                "rule": rule.to_string(),
                "valid": error.is_none(),
                "error": error,
                "anchor_weekday_excluded": rule.anchor_weekday_excluded(anchor),
                "upcoming": upcoming,
            }))
        }
    }
}
