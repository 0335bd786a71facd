//! MongoDB adapters
//!
//! One adapter per repository port plus the [`MongoStore`] entry point
//! holding the database handle. Documents keep the field names the
//! provisioned validators expect (`user_id`, `context_budget`
//! subdocument, status as string); optional timestamps are omitted
//! entirely when absent because the validators type them as dates.

mod checkpoint;
mod demand;
mod metaspec;
mod project;

pub use checkpoint::MongoCheckpointRepository;
pub use demand::MongoDemandRepository;
pub use metaspec::MongoMetaspecRepository;
pub use project::MongoProjectRepository;

use crate::config::StoreConfig;
use crate::error::StoreError;
use cf_domain::ContextBudget;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Database};
use std::str::FromStr;

/// Entry point for MongoDB-backed storage
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to the configured server and select the configured database
    ///
    /// # Errors
    /// `StoreError::Database` if the connection string is invalid.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        Ok(Self {
            database: client.database(&config.database),
        })
    }

    /// Wrap an existing database handle
    #[inline]
    #[must_use]
    pub fn with_database(database: Database) -> Self {
        Self { database }
    }

    /// The underlying database handle
    #[inline]
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Round-trip a ping command to verify the server is reachable
    ///
    /// # Errors
    /// `StoreError::Database` if the server does not answer.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Project adapter
    #[must_use]
    pub fn projects(&self) -> MongoProjectRepository {
        MongoProjectRepository::new(&self.database)
    }

    /// Demand adapter
    #[must_use]
    pub fn demands(&self) -> MongoDemandRepository {
        MongoDemandRepository::new(&self.database)
    }

    /// Metaspec adapter
    #[must_use]
    pub fn metaspecs(&self) -> MongoMetaspecRepository {
        MongoMetaspecRepository::new(&self.database)
    }

    /// Checkpoint adapter
    #[must_use]
    pub fn checkpoints(&self) -> MongoCheckpointRepository {
        MongoCheckpointRepository::new(&self.database)
    }
}

// ---- document mapping helpers ----

fn malformed(collection: &'static str, reason: impl Into<String>) -> StoreError {
    StoreError::Malformed {
        collection,
        reason: reason.into(),
    }
}

pub(crate) fn str_field(
    document: &Document,
    collection: &'static str,
    key: &str,
) -> Result<String, StoreError> {
    document
        .get_str(key)
        .map(str::to_string)
        .map_err(|_| malformed(collection, format!("missing string field {key}")))
}

pub(crate) fn id_field<T>(
    document: &Document,
    collection: &'static str,
    key: &str,
) -> Result<T, StoreError>
where
    T: FromStr,
{
    let raw = document
        .get_str(key)
        .map_err(|_| malformed(collection, format!("missing string field {key}")))?;
    T::from_str(raw).map_err(|_| malformed(collection, format!("field {key} is not a UUID")))
}

pub(crate) fn u64_field(
    document: &Document,
    collection: &'static str,
    key: &str,
) -> Result<u64, StoreError> {
    let value = match document.get(key) {
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Int32(n)) => i64::from(*n),
        _ => return Err(malformed(collection, format!("missing integer field {key}"))),
    };
    u64::try_from(value).map_err(|_| malformed(collection, format!("field {key} is negative")))
}

pub(crate) fn datetime_field(
    document: &Document,
    collection: &'static str,
    key: &str,
) -> Result<DateTime<Utc>, StoreError> {
    document
        .get_datetime(key)
        .map(|dt| dt.to_chrono())
        .map_err(|_| malformed(collection, format!("missing date field {key}")))
}

pub(crate) fn optional_datetime_field(
    document: &Document,
    collection: &'static str,
    key: &str,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    match document.get(key) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::DateTime(dt)) => Ok(Some(dt.to_chrono())),
        Some(_) => Err(malformed(collection, format!("field {key} is not a date"))),
    }
}

pub(crate) fn budget_document(budget: &ContextBudget) -> Document {
    doc! {
        "max_tokens": budget.max_tokens as i64,
        "used_tokens": budget.used_tokens as i64,
    }
}

pub(crate) fn budget_field(
    document: &Document,
    collection: &'static str,
    key: &str,
) -> Result<ContextBudget, StoreError> {
    let subdocument = document
        .get_document(key)
        .map_err(|_| malformed(collection, format!("missing object field {key}")))?;
    Ok(ContextBudget::with_usage(
        u64_field(subdocument, collection, "max_tokens")?,
        u64_field(subdocument, collection, "used_tokens")?,
    ))
}
