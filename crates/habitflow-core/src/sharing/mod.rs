//! Item sharing between users.
//!
//! Sharing copies an item: the sender keeps the original, the recipient
//! owns a separate copy, and a [`ShareEdge`] links the two.

mod edge;
pub mod legacy;
mod resolver;

pub use edge::{EdgeDefect, ShareEdge, ShareStatus};
pub use legacy::{backfill_copy_ids, nearest_copy, BackfillReport, LegacyMatch};
pub use resolver::{
    visible_items, MatchConfidence, Participant, ParticipantRole, SharedItemResolver,
    VisibleItem, VisibleItems,
};
