//! Per-user visible item sets for shared items.
//!
//! A shared item exists twice: the sender's original and the recipient's
//! copy. Each party must see exactly their own record. The resolver hides
//! the other party's record if it leaked into the user's snapshot, attaches
//! the other party as a participant, and reports (rather than fails on)
//! edges it cannot make sense of.

use std::collections::HashSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::edge::{ShareEdge, ShareStatus};
use super::legacy::{self, LegacyMatch};
use crate::context::{EngineContext, DEFAULT_LEGACY_MATCH_WINDOW_HOURS};
use crate::item::RecurringItem;

/// Role the *other* party plays relative to the viewing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// The other party shared this item with the viewer.
    Sender,
    /// The viewer shared this item with the other party.
    Recipient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub role: ParticipantRole,
    pub status: ShareStatus,
}

/// How sure the resolver is about an item's share relationship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    #[default]
    Exact,
    /// Linked to a legacy edge by creation-time proximity.
    LowConfidence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleItem {
    pub item_id: String,
    pub participants: Vec<Participant>,
    pub confidence: MatchConfidence,
}

/// Resolver output: the visible list plus what had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleItems {
    /// Visible items, in the order they were supplied
    pub items: Vec<VisibleItem>,
    /// Edges involving the user whose item is missing from the snapshot
    pub unresolved_edges: usize,
    /// Self-shares and edges whose copy is the original
    pub invalid_edges: usize,
    /// Supplied items owned by someone else
    pub foreign_items: usize,
}

impl VisibleItems {
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.item_id == item_id)
    }

    pub fn get(&self, item_id: &str) -> Option<&VisibleItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.item_id.as_str()).collect()
    }

    /// Whether anything was skipped or guessed.
    pub fn is_degraded(&self) -> bool {
        self.unresolved_edges > 0
            || self.invalid_edges > 0
            || self.foreign_items > 0
            || self
                .items
                .iter()
                .any(|item| item.confidence == MatchConfidence::LowConfidence)
    }
}

/// An edge in play for the viewing user, with its copy id settled.
struct ResolvedEdge<'a> {
    edge: &'a ShareEdge,
    copy: Option<&'a str>,
    confidence: MatchConfidence,
}

/// Builds a user's de-duplicated visible item list.
#[derive(Debug, Clone)]
pub struct SharedItemResolver {
    /// Max distance between a legacy edge and its guessed copy.
    pub legacy_match_window: Duration,
}

impl Default for SharedItemResolver {
    fn default() -> Self {
        Self {
            legacy_match_window: Duration::hours(DEFAULT_LEGACY_MATCH_WINDOW_HOURS),
        }
    }
}

impl SharedItemResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_legacy_window(legacy_match_window: Duration) -> Self {
        Self {
            legacy_match_window,
        }
    }

    pub fn from_context(ctx: &EngineContext) -> Self {
        Self::with_legacy_window(ctx.legacy_match_window)
    }

    /// Resolve what `user_id` sees among `items`.
    ///
    /// `items` should be the user's own records; anything owned by someone
    /// else is skipped and counted. Edges not involving the user are ignored.
    pub fn resolve(
        &self,
        items: &[RecurringItem],
        edges: &[ShareEdge],
        user_id: &str,
    ) -> VisibleItems {
        let mut report = VisibleItems::default();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut owned: Vec<&RecurringItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.owner_id != user_id {
                tracing::warn!(
                    item_id = %item.id,
                    owner_id = %item.owner_id,
                    user_id,
                    "skipping item not owned by the viewing user"
                );
                report.foreign_items += 1;
                continue;
            }
            if seen.insert(item.id.as_str()) {
                owned.push(item);
            }
        }

        let mut in_play: Vec<&ShareEdge> = Vec::new();
        for edge in edges.iter().filter(|edge| edge.involves(user_id)) {
            if let Some(defect) = edge.defect() {
                tracing::warn!(edge_id = %edge.id, ?defect, "skipping invalid share edge");
                report.invalid_edges += 1;
                continue;
            }
            in_play.push(edge);
        }

        let mut hidden: HashSet<&str> = HashSet::new();
        for edge in &in_play {
            if edge.recipient_id == user_id {
                hidden.insert(edge.original_item_id.as_str());
            }
            if edge.sender_id == user_id {
                if let Some(copy) = edge.copied_item_id.as_deref() {
                    hidden.insert(copy);
                }
            }
        }

        let resolved = self.settle_copies(&in_play, &owned, &hidden, user_id, &mut report);

        for entry in &resolved {
            let edge = entry.edge;
            if edge.sender_id == user_id && !seen.contains(edge.original_item_id.as_str()) {
                tracing::warn!(
                    edge_id = %edge.id,
                    item_id = %edge.original_item_id,
                    "shared original missing from snapshot"
                );
                report.unresolved_edges += 1;
            }
            if edge.recipient_id == user_id && edge.is_accepted() {
                if let Some(copy) = entry.copy.filter(|copy| !seen.contains(copy)) {
                    tracing::warn!(
                        edge_id = %edge.id,
                        item_id = copy,
                        "accepted share copy missing from snapshot"
                    );
                    report.unresolved_edges += 1;
                }
            }
        }

        for item in owned {
            if hidden.contains(item.id.as_str()) {
                continue;
            }

            let mut participants: Vec<Participant> = Vec::new();
            let mut confidence = MatchConfidence::Exact;
            for entry in &resolved {
                let edge = entry.edge;
                if edge.sender_id == user_id && edge.original_item_id == item.id {
                    add_participant(
                        &mut participants,
                        &edge.recipient_id,
                        ParticipantRole::Recipient,
                        edge.status,
                    );
                }
                if edge.recipient_id == user_id && entry.copy == Some(item.id.as_str()) {
                    add_participant(
                        &mut participants,
                        &edge.sender_id,
                        ParticipantRole::Sender,
                        edge.status,
                    );
                    if entry.confidence == MatchConfidence::LowConfidence {
                        confidence = MatchConfidence::LowConfidence;
                    }
                }
            }

            report.items.push(VisibleItem {
                item_id: item.id.clone(),
                participants,
                confidence,
            });
        }

        tracing::debug!(
            user_id,
            visible = report.items.len(),
            unresolved = report.unresolved_edges,
            invalid = report.invalid_edges,
            foreign = report.foreign_items,
            "resolved visible items"
        );
        report
    }

    /// Pair every edge with its copy id, guessing for accepted legacy edges
    /// where the user is the recipient.
    fn settle_copies<'a>(
        &self,
        in_play: &[&'a ShareEdge],
        owned: &[&'a RecurringItem],
        hidden: &HashSet<&str>,
        user_id: &str,
        report: &mut VisibleItems,
    ) -> Vec<ResolvedEdge<'a>> {
        let mut claimed: HashSet<&str> = in_play
            .iter()
            .flat_map(|edge| {
                std::iter::once(edge.original_item_id.as_str())
                    .chain(edge.copied_item_id.as_deref())
            })
            .collect();

        let mut resolved = Vec::with_capacity(in_play.len());
        for &edge in in_play {
            let needs_guess =
                edge.is_legacy() && edge.is_accepted() && edge.recipient_id == user_id;
            if !needs_guess {
                resolved.push(ResolvedEdge {
                    edge,
                    copy: edge.copied_item_id.as_deref(),
                    confidence: MatchConfidence::Exact,
                });
                continue;
            }

            let candidates = owned.iter().copied().filter(|item| {
                !claimed.contains(item.id.as_str()) && !hidden.contains(item.id.as_str())
            });
            let copy = match legacy::nearest_copy(edge, candidates, self.legacy_match_window) {
                LegacyMatch::Unique(item) => {
                    tracing::debug!(
                        edge_id = %edge.id,
                        item_id = %item.id,
                        "legacy share edge matched by creation time"
                    );
                    claimed.insert(item.id.as_str());
                    Some(item.id.as_str())
                }
                LegacyMatch::Ambiguous(ids) => {
                    tracing::warn!(
                        edge_id = %edge.id,
                        candidates = ?ids,
                        "legacy share edge copy is ambiguous"
                    );
                    report.unresolved_edges += 1;
                    None
                }
                LegacyMatch::NoMatch => {
                    tracing::warn!(edge_id = %edge.id, "legacy share edge has no matching copy");
                    report.unresolved_edges += 1;
                    None
                }
            };
            resolved.push(ResolvedEdge {
                edge,
                copy,
                confidence: MatchConfidence::LowConfidence,
            });
        }
        resolved
    }
}

fn add_participant(
    participants: &mut Vec<Participant>,
    user_id: &str,
    role: ParticipantRole,
    status: ShareStatus,
) {
    match participants
        .iter_mut()
        .find(|p| p.user_id == user_id && p.role == role)
    {
        Some(existing) => {
            if status == ShareStatus::Accepted {
                existing.status = ShareStatus::Accepted;
            }
        }
        None => participants.push(Participant {
            user_id: user_id.to_string(),
            role,
            status,
        }),
    }
}

/// Resolve with default settings.
pub fn visible_items(items: &[RecurringItem], edges: &[ShareEdge], user_id: &str) -> VisibleItems {
    SharedItemResolver::new().resolve(items, edges, user_id)
}
