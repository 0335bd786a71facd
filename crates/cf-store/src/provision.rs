//! Database provisioning
//!
//! Declarative bootstrap for the Context First database: collections with
//! `$jsonSchema` validators, their indexes, and the application user. The
//! plan itself is pure data; [`ProvisionPlan::apply`] is the only part
//! that talks to the server.
//!
//! Applying is idempotent: an existing collection gets its validator
//! refreshed through `collMod`, index declarations are a server-side
//! no-op when already present, and an existing application user is left
//! untouched.

use crate::collections;
use crate::config::StoreConfig;
use crate::error::{command_error_code, StoreError};
use cf_domain::{DemandStatus, MetaspecKind};
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use std::time::Duration;

const NAMESPACE_EXISTS: i32 = 48;
const USER_ALREADY_EXISTS: i32 = 51003;

/// Index declaration for one collection
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Key pattern (1 ascending, -1 descending)
    pub keys: Document,
    /// Enforce uniqueness
    pub unique: bool,
    /// TTL grace period, `Some(0)` deletes at the indexed timestamp
    pub expire_after: Option<Duration>,
}

impl IndexSpec {
    /// Plain index over `keys`
    #[inline]
    #[must_use]
    pub fn new(keys: Document) -> Self {
        Self {
            keys,
            unique: false,
            expire_after: None,
        }
    }

    /// Mark unique
    #[inline]
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as TTL index with the given grace period
    #[inline]
    #[must_use]
    pub fn ttl(mut self, expire_after: Duration) -> Self {
        self.expire_after = Some(expire_after);
        self
    }

    fn model(&self) -> IndexModel {
        let mut options = IndexOptions::default();
        if self.unique {
            options.unique = Some(true);
        }
        options.expire_after = self.expire_after;
        IndexModel::builder()
            .keys(self.keys.clone())
            .options(options)
            .build()
    }
}

/// Collection declaration: validator plus indexes
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    /// Collection name
    pub name: &'static str,
    /// `$jsonSchema` validator attached at creation
    pub validator: Option<Document>,
    /// Indexes declared after creation
    pub indexes: Vec<IndexSpec>,
}

/// Application credential with `readWrite` on one database
#[derive(Debug, Clone)]
pub struct AppUserSpec {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Database the role is scoped to
    pub database: String,
}

impl AppUserSpec {
    fn command(&self) -> Document {
        doc! {
            "createUser": &self.username,
            "pwd": &self.password,
            "roles": [ { "role": "readWrite", "db": &self.database } ],
        }
    }
}

/// Outcome of applying a provision plan
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    /// Collections created by this run
    pub collections_created: Vec<String>,
    /// Collections that already existed and had their validator refreshed
    pub collections_refreshed: Vec<String>,
    /// Indexes declared (creations and no-op re-declarations)
    pub indexes_declared: usize,
    /// Application user created by this run
    pub app_user_created: bool,
}

impl std::fmt::Display for ProvisionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "collections created: {}", self.collections_created.join(", "))?;
        writeln!(
            f,
            "collections refreshed: {}",
            self.collections_refreshed.join(", ")
        )?;
        writeln!(f, "indexes declared: {}", self.indexes_declared)?;
        write!(
            f,
            "application user: {}",
            if self.app_user_created {
                "created"
            } else {
                "unchanged"
            }
        )
    }
}

/// Declarative database bootstrap
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    /// Collections to declare, in order
    pub collections: Vec<CollectionSpec>,
    /// Application user to create, if any
    pub app_user: Option<AppUserSpec>,
}

impl ProvisionPlan {
    /// The canonical Context First layout
    ///
    /// Four collections with validators, a unique `id` index each, the
    /// listing indexes the repositories query through, a unique
    /// `(demand_id, version)` index on metaspecs, and the TTL index that
    /// expires checkpoints.
    #[must_use]
    pub fn context_first(config: &StoreConfig) -> Self {
        Self {
            collections: vec![
                CollectionSpec {
                    name: collections::PROJECTS,
                    validator: Some(projects_validator()),
                    indexes: vec![
                        IndexSpec::new(doc! { "id": 1 }).unique(),
                        IndexSpec::new(doc! { "user_id": 1, "created_at": -1 }),
                    ],
                },
                CollectionSpec {
                    name: collections::DEMANDS,
                    validator: Some(demands_validator()),
                    indexes: vec![
                        IndexSpec::new(doc! { "id": 1 }).unique(),
                        IndexSpec::new(doc! { "project_id": 1, "status": 1 }),
                        IndexSpec::new(doc! { "project_id": 1, "created_at": -1 }),
                    ],
                },
                CollectionSpec {
                    name: collections::METASPECS,
                    validator: Some(metaspecs_validator()),
                    indexes: vec![
                        IndexSpec::new(doc! { "id": 1 }).unique(),
                        IndexSpec::new(doc! { "demand_id": 1, "version": -1 }).unique(),
                    ],
                },
                CollectionSpec {
                    name: collections::CHECKPOINTS,
                    validator: Some(checkpoints_validator()),
                    indexes: vec![
                        IndexSpec::new(doc! { "id": 1 }).unique(),
                        IndexSpec::new(doc! { "demand_id": 1, "created_at": -1 }),
                        IndexSpec::new(doc! { "expires_at": 1 }).ttl(Duration::ZERO),
                    ],
                },
            ],
            app_user: Some(AppUserSpec {
                username: config.app_user.clone(),
                password: config.app_password.clone(),
                database: config.database.clone(),
            }),
        }
    }

    /// Skip application-user creation
    #[inline]
    #[must_use]
    pub fn without_app_user(mut self) -> Self {
        self.app_user = None;
        self
    }

    /// Apply the plan to `database`
    ///
    /// # Errors
    /// `StoreError::Database` on any server failure other than the
    /// already-exists cases the plan tolerates.
    pub async fn apply(&self, database: &Database) -> Result<ProvisionReport, StoreError> {
        let mut report = ProvisionReport::default();

        for spec in &self.collections {
            let mut create = database.create_collection(spec.name);
            if let Some(validator) = &spec.validator {
                create = create.validator(validator.clone());
            }

            match create.await {
                Ok(()) => {
                    tracing::info!(collection = spec.name, "collection created");
                    report.collections_created.push(spec.name.to_string());
                }
                Err(err) if command_error_code(&err) == Some(NAMESPACE_EXISTS) => {
                    if let Some(validator) = &spec.validator {
                        database
                            .run_command(doc! {
                                "collMod": spec.name,
                                "validator": validator.clone(),
                            })
                            .await?;
                    }
                    tracing::info!(collection = spec.name, "collection exists, validator refreshed");
                    report.collections_refreshed.push(spec.name.to_string());
                }
                Err(err) => return Err(err.into()),
            }

            let collection = database.collection::<Document>(spec.name);
            for index in &spec.indexes {
                collection.create_index(index.model()).await?;
                report.indexes_declared += 1;
            }
            tracing::debug!(
                collection = spec.name,
                indexes = spec.indexes.len(),
                "indexes declared"
            );
        }

        if let Some(user) = &self.app_user {
            match database.run_command(user.command()).await {
                Ok(_) => {
                    tracing::info!(user = %user.username, "application user created");
                    report.app_user_created = true;
                }
                Err(err) if command_error_code(&err) == Some(USER_ALREADY_EXISTS) => {
                    tracing::info!(user = %user.username, "application user already exists");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(report)
    }
}

fn projects_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["id", "user_id", "name", "context_budget", "created_at"],
            "properties": {
                "id": { "bsonType": "string" },
                "user_id": { "bsonType": "string" },
                "name": { "bsonType": "string" },
                "description": { "bsonType": "string" },
                "context_budget": { "bsonType": "object" },
                "created_at": { "bsonType": "date" },
                "updated_at": { "bsonType": "date" },
            }
        }
    }
}

fn demands_validator() -> Document {
    let statuses: Vec<&str> = DemandStatus::ALL.iter().map(|s| s.as_str()).collect();
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["id", "project_id", "title", "description", "status", "created_at"],
            "properties": {
                "id": { "bsonType": "string" },
                "project_id": { "bsonType": "string" },
                "title": { "bsonType": "string" },
                "description": { "bsonType": "string" },
                "status": { "enum": statuses },
                "metaspecs": { "bsonType": "array" },
                "context_budget": { "bsonType": "object" },
                "created_at": { "bsonType": "date" },
                "updated_at": { "bsonType": "date" },
            }
        }
    }
}

fn metaspecs_validator() -> Document {
    let kinds: Vec<&str> = MetaspecKind::ALL.iter().map(|k| k.as_str()).collect();
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["id", "demand_id", "type", "content", "version", "created_at"],
            "properties": {
                "id": { "bsonType": "string" },
                "demand_id": { "bsonType": "string" },
                "type": { "enum": kinds },
                "content": { "bsonType": "string" },
                "version": { "bsonType": ["int", "long"] },
                "created_at": { "bsonType": "date" },
                "updated_at": { "bsonType": "date" },
            }
        }
    }
}

fn checkpoints_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["id", "demand_id", "context_snapshot", "tokens_used", "created_at"],
            "properties": {
                "id": { "bsonType": "string" },
                "demand_id": { "bsonType": "string" },
                "context_snapshot": { "bsonType": "string" },
                "tokens_used": { "bsonType": ["int", "long"] },
                "created_at": { "bsonType": "date" },
                "expires_at": { "bsonType": "date" },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    fn plan() -> ProvisionPlan {
        ProvisionPlan::context_first(&StoreConfig::default())
    }

    fn collection<'a>(plan: &'a ProvisionPlan, name: &str) -> &'a CollectionSpec {
        plan.collections
            .iter()
            .find(|spec| spec.name == name)
            .unwrap()
    }

    fn required_fields(spec: &CollectionSpec) -> Vec<String> {
        let schema = spec
            .validator
            .as_ref()
            .unwrap()
            .get_document("$jsonSchema")
            .unwrap();
        schema
            .get_array("required")
            .unwrap()
            .iter()
            .map(|value| value.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn plan_declares_all_four_collections() {
        let plan = plan();
        let names: Vec<&str> = plan.collections.iter().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            vec!["projects", "demands", "metaspecs", "checkpoints"]
        );
    }

    #[test]
    fn every_collection_has_a_unique_id_index() {
        for spec in &plan().collections {
            let id_index = spec
                .indexes
                .iter()
                .find(|index| index.keys == doc! { "id": 1 })
                .unwrap_or_else(|| panic!("{} is missing the id index", spec.name));
            assert!(id_index.unique, "{} id index must be unique", spec.name);
        }
    }

    #[test]
    fn every_validator_requires_id_and_created_at() {
        for spec in &plan().collections {
            let required = required_fields(spec);
            assert!(required.contains(&"id".to_string()), "{}", spec.name);
            assert!(required.contains(&"created_at".to_string()), "{}", spec.name);
        }
    }

    #[test]
    fn demand_status_enum_lists_the_workflow() {
        let plan = plan();
        let spec = collection(&plan, "demands");
        let schema = spec
            .validator
            .as_ref()
            .unwrap()
            .get_document("$jsonSchema")
            .unwrap();
        let statuses: Vec<&str> = schema
            .get_document("properties")
            .unwrap()
            .get_document("status")
            .unwrap()
            .get_array("enum")
            .unwrap()
            .iter()
            .map(|value| value.as_str().unwrap())
            .collect();
        assert_eq!(
            statuses,
            vec![
                "draft",
                "spec_approved",
                "architecture_done",
                "code_complete",
                "pr_merged",
            ]
        );
    }

    #[test]
    fn metaspec_versions_are_unique_per_demand() {
        let plan = plan();
        let spec = collection(&plan, "metaspecs");
        let version_index = spec
            .indexes
            .iter()
            .find(|index| index.keys == doc! { "demand_id": 1, "version": -1 })
            .unwrap();
        assert!(version_index.unique);
    }

    #[test]
    fn checkpoints_expire_at_the_indexed_timestamp() {
        let plan = plan();
        let spec = collection(&plan, "checkpoints");
        let ttl_index = spec
            .indexes
            .iter()
            .find(|index| index.keys == doc! { "expires_at": 1 })
            .unwrap();
        assert_eq!(ttl_index.expire_after, Some(Duration::ZERO));
        assert!(!ttl_index.unique);
    }

    #[test]
    fn app_user_is_scoped_to_the_configured_database() {
        let config = StoreConfig::default().with_database("context_first_test");
        let plan = ProvisionPlan::context_first(&config);
        let command = plan.app_user.as_ref().unwrap().command();

        assert_eq!(command.get_str("createUser").unwrap(), "context_first_app");
        let roles = command.get_array("roles").unwrap();
        assert_eq!(roles.len(), 1);
        match &roles[0] {
            Bson::Document(role) => {
                assert_eq!(role.get_str("role").unwrap(), "readWrite");
                assert_eq!(role.get_str("db").unwrap(), "context_first_test");
            }
            other => panic!("unexpected role shape: {other:?}"),
        }
    }

    #[test]
    fn without_app_user_drops_the_credential() {
        let plan = plan().without_app_user();
        assert!(plan.app_user.is_none());
    }
}
