//! Checkpoint entity
//!
//! A checkpoint snapshots conversation state for a demand so context can
//! be restored later. Storage-agnostic: where the snapshot ultimately
//! lives and how it is compressed is an infrastructure concern. Expiry is
//! enforced by the database TTL index on `expires_at`.

use crate::error::DomainError;
use crate::ids::{CheckpointId, DemandId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Saved conversation state for a demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint identifier
    pub id: CheckpointId,
    /// Demand this checkpoint belongs to
    pub demand_id: DemandId,
    /// Serialized JSON snapshot of the conversation context
    pub context_snapshot: String,
    /// Tokens consumed up to this checkpoint
    pub tokens_used: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp consumed by the database TTL index
    pub expires_at: Option<DateTime<Utc>>,
}

impl Checkpoint {
    /// Create a new checkpoint without an expiry
    ///
    /// # Errors
    /// `DomainError::InvalidCheckpoint` if the snapshot is blank or
    /// `tokens_used` is zero.
    pub fn new(
        demand_id: DemandId,
        context_snapshot: impl Into<String>,
        tokens_used: u64,
    ) -> Result<Self, DomainError> {
        let context_snapshot = context_snapshot.into();
        if context_snapshot.trim().is_empty() {
            return Err(DomainError::InvalidCheckpoint(
                "context_snapshot cannot be empty".to_string(),
            ));
        }
        if tokens_used == 0 {
            return Err(DomainError::InvalidCheckpoint(
                "tokens_used must be positive".to_string(),
            ));
        }

        Ok(Self {
            id: CheckpointId::new(),
            demand_id,
            context_snapshot,
            tokens_used,
            created_at: Utc::now(),
            expires_at: None,
        })
    }

    /// With an expiry timestamp
    #[inline]
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check whether the checkpoint has expired
    ///
    /// A checkpoint without `expires_at` never expires.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }
}
