//! MongoDB adapter for demands

use super::{
    budget_document, budget_field, datetime_field, id_field, optional_datetime_field, str_field,
};
use crate::collections;
use crate::error::{is_duplicate_key, StoreError};
use crate::repository::DemandRepository;
use async_trait::async_trait;
use cf_domain::{Demand, DemandId, DemandStatus, ProjectId};
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::{Collection, Database};
use std::str::FromStr;

/// MongoDB implementation of [`DemandRepository`]
#[derive(Debug, Clone)]
pub struct MongoDemandRepository {
    collection: Collection<Document>,
}

impl MongoDemandRepository {
    /// Bind to the demands collection of `database`
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(collections::DEMANDS),
        }
    }

    async fn find_sorted(&self, filter: Document) -> Result<Vec<Demand>, StoreError> {
        let mut cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;

        let mut demands = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            demands.push(to_entity(&document)?);
        }
        Ok(demands)
    }
}

#[async_trait]
impl DemandRepository for MongoDemandRepository {
    async fn create(&self, demand: &Demand) -> Result<(), StoreError> {
        self.collection
            .insert_one(to_document(demand))
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    StoreError::Duplicate {
                        entity: "demand",
                        id: demand.id.to_string(),
                    }
                } else {
                    err.into()
                }
            })?;
        Ok(())
    }

    async fn get(&self, id: DemandId) -> Result<Option<Demand>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "id": id.to_string() })
            .await?;
        found.map(|document| to_entity(&document)).transpose()
    }

    async fn update(&self, demand: &Demand) -> Result<(), StoreError> {
        let result = self
            .collection
            .replace_one(doc! { "id": demand.id.to_string() }, to_document(demand))
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                entity: "demand",
                id: demand.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, id: DemandId) -> Result<(), StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "id": id.to_string() })
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                entity: "demand",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Demand>, StoreError> {
        self.find_sorted(doc! { "project_id": project_id.to_string() })
            .await
    }

    async fn list_for_project_with_status(
        &self,
        project_id: ProjectId,
        status: DemandStatus,
    ) -> Result<Vec<Demand>, StoreError> {
        self.find_sorted(doc! {
            "project_id": project_id.to_string(),
            "status": status.as_str(),
        })
        .await
    }
}

fn to_document(demand: &Demand) -> Document {
    let mut document = doc! {
        "id": demand.id.to_string(),
        "project_id": demand.project_id.to_string(),
        "title": &demand.title,
        "description": &demand.description,
        "status": demand.status.as_str(),
        "created_at": DateTime::from_chrono(demand.created_at),
    };
    if let Some(budget) = &demand.context_budget {
        document.insert("context_budget", budget_document(budget));
    }
    if let Some(updated_at) = demand.updated_at {
        document.insert("updated_at", DateTime::from_chrono(updated_at));
    }
    document
}

fn to_entity(document: &Document) -> Result<Demand, StoreError> {
    const COLLECTION: &str = collections::DEMANDS;

    let raw_status = str_field(document, COLLECTION, "status")?;
    let status = DemandStatus::from_str(&raw_status).map_err(|_| StoreError::Malformed {
        collection: COLLECTION,
        reason: format!("unknown status {raw_status}"),
    })?;

    let context_budget = if document.contains_key("context_budget") {
        Some(budget_field(document, COLLECTION, "context_budget")?)
    } else {
        None
    };

    Ok(Demand {
        id: id_field(document, COLLECTION, "id")?,
        project_id: id_field(document, COLLECTION, "project_id")?,
        title: str_field(document, COLLECTION, "title")?,
        description: str_field(document, COLLECTION, "description")?,
        status,
        context_budget,
        created_at: datetime_field(document, COLLECTION, "created_at")?,
        updated_at: optional_datetime_field(document, COLLECTION, "updated_at")?,
    })
}
