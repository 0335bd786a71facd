//! MongoDB adapter for metaspecs
//!
//! The `(demand_id, version)` index is declared unique, so two revisions
//! of the same demand can never share a version number.

use super::{datetime_field, id_field, optional_datetime_field, str_field, u64_field};
use crate::collections;
use crate::error::{is_duplicate_key, StoreError};
use crate::repository::MetaspecRepository;
use async_trait::async_trait;
use cf_domain::{DemandId, Metaspec, MetaspecId, MetaspecKind};
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::{Collection, Database};
use std::str::FromStr;

/// MongoDB implementation of [`MetaspecRepository`]
#[derive(Debug, Clone)]
pub struct MongoMetaspecRepository {
    collection: Collection<Document>,
}

impl MongoMetaspecRepository {
    /// Bind to the metaspecs collection of `database`
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(collections::METASPECS),
        }
    }
}

#[async_trait]
impl MetaspecRepository for MongoMetaspecRepository {
    async fn create(&self, metaspec: &Metaspec) -> Result<(), StoreError> {
        self.collection
            .insert_one(to_document(metaspec))
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    StoreError::Duplicate {
                        entity: "metaspec",
                        id: metaspec.id.to_string(),
                    }
                } else {
                    err.into()
                }
            })?;
        Ok(())
    }

    async fn get(&self, id: MetaspecId) -> Result<Option<Metaspec>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "id": id.to_string() })
            .await?;
        found.map(|document| to_entity(&document)).transpose()
    }

    async fn update(&self, metaspec: &Metaspec) -> Result<(), StoreError> {
        let result = self
            .collection
            .replace_one(doc! { "id": metaspec.id.to_string() }, to_document(metaspec))
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                entity: "metaspec",
                id: metaspec.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, id: MetaspecId) -> Result<(), StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "id": id.to_string() })
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                entity: "metaspec",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn latest_for_demand(
        &self,
        demand_id: DemandId,
    ) -> Result<Option<Metaspec>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "demand_id": demand_id.to_string() })
            .sort(doc! { "version": -1 })
            .await?;
        found.map(|document| to_entity(&document)).transpose()
    }

    async fn history_for_demand(&self, demand_id: DemandId) -> Result<Vec<Metaspec>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! { "demand_id": demand_id.to_string() })
            .sort(doc! { "version": -1 })
            .await?;

        let mut metaspecs = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            metaspecs.push(to_entity(&document)?);
        }
        Ok(metaspecs)
    }
}

fn to_document(metaspec: &Metaspec) -> Document {
    let mut document = doc! {
        "id": metaspec.id.to_string(),
        "demand_id": metaspec.demand_id.to_string(),
        "type": metaspec.kind.as_str(),
        "content": &metaspec.content,
        "version": i64::from(metaspec.version),
        "created_at": DateTime::from_chrono(metaspec.created_at),
    };
    if let Some(updated_at) = metaspec.updated_at {
        document.insert("updated_at", DateTime::from_chrono(updated_at));
    }
    document
}

fn to_entity(document: &Document) -> Result<Metaspec, StoreError> {
    const COLLECTION: &str = collections::METASPECS;

    let raw_kind = str_field(document, COLLECTION, "type")?;
    let kind = MetaspecKind::from_str(&raw_kind).map_err(|_| StoreError::Malformed {
        collection: COLLECTION,
        reason: format!("unknown type {raw_kind}"),
    })?;

    let version = u64_field(document, COLLECTION, "version")?;
    let version = u32::try_from(version).map_err(|_| StoreError::Malformed {
        collection: COLLECTION,
        reason: format!("version {version} out of range"),
    })?;

    Ok(Metaspec {
        id: id_field(document, COLLECTION, "id")?,
        demand_id: id_field(document, COLLECTION, "demand_id")?,
        kind,
        content: str_field(document, COLLECTION, "content")?,
        version,
        created_at: datetime_field(document, COLLECTION, "created_at")?,
        updated_at: optional_datetime_field(document, COLLECTION, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, DurationRound, Utc};

    fn sample_metaspec() -> Metaspec {
        let now = Utc::now().duration_trunc(Duration::milliseconds(1)).unwrap();
        let mut metaspec = Metaspec::new(
            DemandId::new(),
            MetaspecKind::Technical,
            "# Search\n\nUse an inverted index.",
        )
        .unwrap();
        metaspec.created_at = now;
        metaspec
    }

    #[test]
    fn document_round_trip() {
        let metaspec = sample_metaspec();
        let back = to_entity(&to_document(&metaspec)).unwrap();
        assert_eq!(back, metaspec);
    }

    #[test]
    fn kind_is_stored_as_type() {
        let document = to_document(&sample_metaspec());
        assert_eq!(document.get_str("type").unwrap(), "technical");
        assert!(!document.contains_key("kind"));
    }

    #[test]
    fn unknown_kind_is_malformed() {
        let mut document = to_document(&sample_metaspec());
        document.insert("type", "legal");
        let err = to_entity(&document).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
