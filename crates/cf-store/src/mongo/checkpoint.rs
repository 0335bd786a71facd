//! MongoDB adapter for checkpoints
//!
//! Expiry is handled by the TTL index on `expires_at`; the adapter never
//! filters expired documents itself.

use super::{datetime_field, id_field, optional_datetime_field, str_field, u64_field};
use crate::collections;
use crate::error::{is_duplicate_key, StoreError};
use crate::repository::CheckpointRepository;
use async_trait::async_trait;
use cf_domain::{Checkpoint, CheckpointId, DemandId};
use mongodb::bson::{doc, DateTime, Document};
use mongodb::{Collection, Database};

/// MongoDB implementation of [`CheckpointRepository`]
#[derive(Debug, Clone)]
pub struct MongoCheckpointRepository {
    collection: Collection<Document>,
}

impl MongoCheckpointRepository {
    /// Bind to the checkpoints collection of `database`
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(collections::CHECKPOINTS),
        }
    }
}

#[async_trait]
impl CheckpointRepository for MongoCheckpointRepository {
    async fn create(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        self.collection
            .insert_one(to_document(checkpoint))
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    StoreError::Duplicate {
                        entity: "checkpoint",
                        id: checkpoint.id.to_string(),
                    }
                } else {
                    err.into()
                }
            })?;
        Ok(())
    }

    async fn get(&self, id: CheckpointId) -> Result<Option<Checkpoint>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "id": id.to_string() })
            .await?;
        found.map(|document| to_entity(&document)).transpose()
    }

    async fn update(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        let result = self
            .collection
            .replace_one(
                doc! { "id": checkpoint.id.to_string() },
                to_document(checkpoint),
            )
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                entity: "checkpoint",
                id: checkpoint.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, id: CheckpointId) -> Result<(), StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "id": id.to_string() })
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                entity: "checkpoint",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn latest_for_demand(
        &self,
        demand_id: DemandId,
    ) -> Result<Option<Checkpoint>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "demand_id": demand_id.to_string() })
            .sort(doc! { "created_at": -1 })
            .await?;
        found.map(|document| to_entity(&document)).transpose()
    }
}

fn to_document(checkpoint: &Checkpoint) -> Document {
    let mut document = doc! {
        "id": checkpoint.id.to_string(),
        "demand_id": checkpoint.demand_id.to_string(),
        "context_snapshot": &checkpoint.context_snapshot,
        "tokens_used": checkpoint.tokens_used as i64,
        "created_at": DateTime::from_chrono(checkpoint.created_at),
    };
    if let Some(expires_at) = checkpoint.expires_at {
        document.insert("expires_at", DateTime::from_chrono(expires_at));
    }
    document
}

fn to_entity(document: &Document) -> Result<Checkpoint, StoreError> {
    const COLLECTION: &str = collections::CHECKPOINTS;
    Ok(Checkpoint {
        id: id_field(document, COLLECTION, "id")?,
        demand_id: id_field(document, COLLECTION, "demand_id")?,
        context_snapshot: str_field(document, COLLECTION, "context_snapshot")?,
        tokens_used: u64_field(document, COLLECTION, "tokens_used")?,
        created_at: datetime_field(document, COLLECTION, "created_at")?,
        expires_at: optional_datetime_field(document, COLLECTION, "expires_at")?,
    })
}
