//! Degraded matching for share edges recorded without a copy reference.
//!
//! This is the only place that guesses which item is a recipient's copy.
//! The guess is the recipient-owned item created closest to the edge,
//! within a bounded window, and only when that closest item is unique.
//! Everything it produces is treated as low confidence.

use std::collections::HashSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::edge::ShareEdge;
use crate::item::RecurringItem;

/// Outcome of guessing a legacy edge's copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyMatch<'a> {
    Unique(&'a RecurringItem),
    /// Several candidates are equally close; ids in candidate order.
    Ambiguous(Vec<&'a str>),
    NoMatch,
}

/// Find the recipient-owned candidate created nearest to the edge.
pub fn nearest_copy<'a, I>(edge: &ShareEdge, candidates: I, window: Duration) -> LegacyMatch<'a>
where
    I: IntoIterator<Item = &'a RecurringItem>,
{
    let window_ms = window.num_milliseconds().abs();
    let mut best_distance = i64::MAX;
    let mut best: Vec<&'a RecurringItem> = Vec::new();

    for item in candidates {
        if item.owner_id != edge.recipient_id || item.id == edge.original_item_id {
            continue;
        }
        let distance = (item.created_at - edge.created_at).num_milliseconds().abs();
        if distance > window_ms {
            continue;
        }
        if distance < best_distance {
            best_distance = distance;
            best.clear();
            best.push(item);
        } else if distance == best_distance {
            best.push(item);
        }
    }

    match best.as_slice() {
        [] => LegacyMatch::NoMatch,
        [only] => LegacyMatch::Unique(*only),
        many => LegacyMatch::Ambiguous(many.iter().copied().map(|item| item.id.as_str()).collect()),
    }
}

/// Result of a one-time copy reference backfill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    /// Edges that received a copy id
    pub filled: Vec<String>,
    /// Edges with several equally likely copies; left untouched
    pub ambiguous: Vec<String>,
    /// Accepted edges with no candidate in range
    pub unmatched: Vec<String>,
    /// Pending legacy edges; their copy does not exist yet
    pub pending: Vec<String>,
    /// Edges skipped because they are self-shares or otherwise malformed
    pub invalid: Vec<String>,
}

/// Fill `copied_item_id` on legacy edges where a unique nearest copy exists.
///
/// Items already referenced by any edge (as original or explicit copy) are
/// never offered as candidates, and each item is assigned to at most one
/// edge. Edges are visited in slice order.
pub fn backfill_copy_ids(
    edges: &mut [ShareEdge],
    items: &[RecurringItem],
    window: Duration,
) -> BackfillReport {
    let mut claimed: HashSet<String> = edges
        .iter()
        .flat_map(|edge| {
            std::iter::once(edge.original_item_id.clone()).chain(edge.copied_item_id.clone())
        })
        .collect();
    let mut report = BackfillReport::default();

    for edge in edges.iter_mut().filter(|edge| edge.is_legacy()) {
        if edge.defect().is_some() {
            report.invalid.push(edge.id.clone());
            continue;
        }
        if !edge.is_accepted() {
            report.pending.push(edge.id.clone());
            continue;
        }

        let candidates = items.iter().filter(|item| !claimed.contains(&item.id));
        match nearest_copy(edge, candidates, window) {
            LegacyMatch::Unique(item) => {
                claimed.insert(item.id.clone());
                edge.copied_item_id = Some(item.id.clone());
                report.filled.push(edge.id.clone());
            }
            LegacyMatch::Ambiguous(ids) => {
                tracing::warn!(
                    edge_id = %edge.id,
                    candidates = ?ids,
                    "legacy share edge has several equally likely copies"
                );
                report.ambiguous.push(edge.id.clone());
            }
            LegacyMatch::NoMatch => report.unmatched.push(edge.id.clone()),
        }
    }

    tracing::info!(
        filled = report.filled.len(),
        ambiguous = report.ambiguous.len(),
        unmatched = report.unmatched.len(),
        pending = report.pending.len(),
        "share copy backfill finished"
    );
    report
}
