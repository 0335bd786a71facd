//! MongoDB adapter for projects

use super::{
    budget_document, budget_field, datetime_field, id_field, optional_datetime_field, str_field,
};
use crate::collections;
use crate::error::{is_duplicate_key, StoreError};
use crate::repository::ProjectRepository;
use async_trait::async_trait;
use cf_domain::{Project, ProjectId};
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::{Collection, Database};

/// MongoDB implementation of [`ProjectRepository`]
#[derive(Debug, Clone)]
pub struct MongoProjectRepository {
    collection: Collection<Document>,
}

impl MongoProjectRepository {
    /// Bind to the projects collection of `database`
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(collections::PROJECTS),
        }
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    async fn create(&self, project: &Project) -> Result<(), StoreError> {
        self.collection
            .insert_one(to_document(project))
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    StoreError::Duplicate {
                        entity: "project",
                        id: project.id.to_string(),
                    }
                } else {
                    err.into()
                }
            })?;
        Ok(())
    }

    async fn get(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "id": id.to_string() })
            .await?;
        found.map(|document| to_entity(&document)).transpose()
    }

    async fn update(&self, project: &Project) -> Result<(), StoreError> {
        let result = self
            .collection
            .replace_one(doc! { "id": project.id.to_string() }, to_document(project))
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                entity: "project",
                id: project.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> Result<(), StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "id": id.to_string() })
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                entity: "project",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! { "user_id": owner_id })
            .sort(doc! { "created_at": -1 })
            .await?;

        let mut projects = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            projects.push(to_entity(&document)?);
        }
        Ok(projects)
    }
}

fn to_document(project: &Project) -> Document {
    let mut document = doc! {
        "id": project.id.to_string(),
        "name": &project.name,
        "description": &project.description,
        "user_id": &project.owner_id,
        "context_budget": budget_document(&project.context_budget),
        "created_at": DateTime::from_chrono(project.created_at),
    };
    if let Some(updated_at) = project.updated_at {
        document.insert("updated_at", DateTime::from_chrono(updated_at));
    }
    document
}

fn to_entity(document: &Document) -> Result<Project, StoreError> {
    const COLLECTION: &str = collections::PROJECTS;
    Ok(Project {
        id: id_field(document, COLLECTION, "id")?,
        name: str_field(document, COLLECTION, "name")?,
        description: str_field(document, COLLECTION, "description")?,
        owner_id: str_field(document, COLLECTION, "user_id")?,
        context_budget: budget_field(document, COLLECTION, "context_budget")?,
        created_at: datetime_field(document, COLLECTION, "created_at")?,
        updated_at: optional_datetime_field(document, COLLECTION, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_domain::ContextBudget;
    use chrono::{Duration, DurationRound, Utc};

    fn sample_project() -> Project {
        // BSON dates carry millisecond precision
        let now = Utc::now().duration_trunc(Duration::milliseconds(1)).unwrap();
        let mut project = Project::new(
            "Roundtrip",
            "mapping test",
            "user_7",
            ContextBudget::with_usage(50_000, 1_200),
        )
        .unwrap();
        project.created_at = now;
        project
    }

    #[test]
    fn document_round_trip() {
        let project = sample_project();
        let back = to_entity(&to_document(&project)).unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn owner_is_stored_as_user_id() {
        let document = to_document(&sample_project());
        assert_eq!(document.get_str("user_id").unwrap(), "user_7");
        assert!(!document.contains_key("owner_id"));
    }

    #[test]
    fn absent_updated_at_is_omitted() {
        let document = to_document(&sample_project());
        assert!(!document.contains_key("updated_at"));
    }

    #[test]
    fn updated_at_round_trip() {
        let mut project = sample_project();
        project.consume_tokens(100).unwrap();
        project.updated_at = project
            .updated_at
            .map(|t| t.duration_trunc(Duration::milliseconds(1)).unwrap());

        let back = to_entity(&to_document(&project)).unwrap();
        assert_eq!(back.updated_at, project.updated_at);
        assert_eq!(back.context_budget.used_tokens, 100);
    }

    #[test]
    fn malformed_document_is_reported() {
        let document = doc! { "id": "not-a-uuid", "name": "x" };
        let err = to_entity(&document).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
