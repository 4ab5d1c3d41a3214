//! Share edges between a sender's original and a recipient's copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ShareTransitionError, ValidationError};

/// Lifecycle state of a share edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    #[default]
    Pending,
    Accepted,
}

impl ShareStatus {
    pub fn can_transition_to(&self, next: &ShareStatus) -> bool {
        matches!((self, next), (ShareStatus::Pending, ShareStatus::Accepted))
    }
}

/// Directed link from a sender's original item to the recipient's copy.
///
/// `copied_item_id` is always set for edges created through [`ShareEdge::new`];
/// it is optional only so historical records still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEdge {
    pub id: String,
    pub original_item_id: String,
    #[serde(default)]
    pub copied_item_id: Option<String>,
    pub sender_id: String,
    pub recipient_id: String,
    #[serde(default)]
    pub status: ShareStatus,
    pub created_at: DateTime<Utc>,
}

/// Structural problems that make an edge meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDefect {
    SelfShare,
    CopyIsOriginal,
}

impl ShareEdge {
    /// New pending edge with an explicit copy reference.
    ///
    /// # Errors
    /// Rejects self-shares and a copy id equal to the original id.
    pub fn new(
        original_item_id: impl Into<String>,
        copied_item_id: impl Into<String>,
        sender_id: impl Into<String>,
        recipient_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let edge = Self {
            id: uuid::Uuid::new_v4().to_string(),
            original_item_id: original_item_id.into(),
            copied_item_id: Some(copied_item_id.into()),
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            status: ShareStatus::Pending,
            created_at,
        };
        edge.validate()?;
        Ok(edge)
    }

    /// Mark the recipient's copy as existing.
    ///
    /// # Errors
    /// Fails if the edge is already accepted or has no copy reference.
    pub fn accept(&mut self) -> Result<(), ShareTransitionError> {
        if !self.status.can_transition_to(&ShareStatus::Accepted) {
            return Err(ShareTransitionError::InvalidTransition {
                from: self.status,
                to: ShareStatus::Accepted,
            });
        }
        if self.copied_item_id.is_none() {
            return Err(ShareTransitionError::MissingCopy {
                edge_id: self.id.clone(),
            });
        }
        self.status = ShareStatus::Accepted;
        Ok(())
    }

    /// Recorded before copy references were mandatory.
    pub fn is_legacy(&self) -> bool {
        self.copied_item_id.is_none()
    }

    pub fn is_accepted(&self) -> bool {
        self.status == ShareStatus::Accepted
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    pub fn defect(&self) -> Option<EdgeDefect> {
        if self.sender_id == self.recipient_id {
            Some(EdgeDefect::SelfShare)
        } else if self.copied_item_id.as_deref() == Some(self.original_item_id.as_str()) {
            Some(EdgeDefect::CopyIsOriginal)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.defect() {
            Some(EdgeDefect::SelfShare) => Err(ValidationError::SelfShare {
                user_id: self.sender_id.clone(),
            }),
            Some(EdgeDefect::CopyIsOriginal) => Err(ValidationError::CopyIsOriginal {
                item_id: self.original_item_id.clone(),
            }),
            None => Ok(()),
        }
    }
}
