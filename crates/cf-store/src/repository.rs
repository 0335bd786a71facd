//! Repository ports
//!
//! One port per aggregate, CRUD plus the queries the collection indexes
//! exist for. Adapters live in [`crate::mongo`] and [`crate::memory`].

use crate::error::StoreError;
use async_trait::async_trait;
use cf_domain::{
    Checkpoint, CheckpointId, Demand, DemandId, DemandStatus, Metaspec, MetaspecId, Project,
    ProjectId,
};

/// Project persistence operations
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Persist a new project
    ///
    /// # Errors
    /// `StoreError::Duplicate` if a project with the same id exists.
    async fn create(&self, project: &Project) -> Result<(), StoreError>;

    /// Retrieve a project by id
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Replace an existing project
    ///
    /// # Errors
    /// `StoreError::NotFound` if the project does not exist.
    async fn update(&self, project: &Project) -> Result<(), StoreError>;

    /// Remove a project
    ///
    /// # Errors
    /// `StoreError::NotFound` if the project does not exist.
    async fn delete(&self, id: ProjectId) -> Result<(), StoreError>;

    /// Projects owned by `owner_id`, newest first
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Project>, StoreError>;
}

/// Demand persistence operations
#[async_trait]
pub trait DemandRepository: Send + Sync {
    /// Persist a new demand
    ///
    /// # Errors
    /// `StoreError::Duplicate` if a demand with the same id exists.
    async fn create(&self, demand: &Demand) -> Result<(), StoreError>;

    /// Retrieve a demand by id
    async fn get(&self, id: DemandId) -> Result<Option<Demand>, StoreError>;

    /// Replace an existing demand
    ///
    /// # Errors
    /// `StoreError::NotFound` if the demand does not exist.
    async fn update(&self, demand: &Demand) -> Result<(), StoreError>;

    /// Remove a demand
    ///
    /// # Errors
    /// `StoreError::NotFound` if the demand does not exist.
    async fn delete(&self, id: DemandId) -> Result<(), StoreError>;

    /// Demands of a project, newest first
    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Demand>, StoreError>;

    /// Demands of a project in a given workflow status, newest first
    async fn list_for_project_with_status(
        &self,
        project_id: ProjectId,
        status: DemandStatus,
    ) -> Result<Vec<Demand>, StoreError>;
}

/// Metaspec persistence operations
#[async_trait]
pub trait MetaspecRepository: Send + Sync {
    /// Persist a new metaspec
    ///
    /// # Errors
    /// `StoreError::Duplicate` if a metaspec with the same id, or the same
    /// `(demand, version)` pair, exists.
    async fn create(&self, metaspec: &Metaspec) -> Result<(), StoreError>;

    /// Retrieve a metaspec by id
    async fn get(&self, id: MetaspecId) -> Result<Option<Metaspec>, StoreError>;

    /// Replace an existing metaspec
    ///
    /// # Errors
    /// `StoreError::NotFound` if the metaspec does not exist.
    async fn update(&self, metaspec: &Metaspec) -> Result<(), StoreError>;

    /// Remove a metaspec
    ///
    /// # Errors
    /// `StoreError::NotFound` if the metaspec does not exist.
    async fn delete(&self, id: MetaspecId) -> Result<(), StoreError>;

    /// Highest-version metaspec of a demand
    async fn latest_for_demand(&self, demand_id: DemandId)
        -> Result<Option<Metaspec>, StoreError>;

    /// All metaspec versions of a demand, highest version first
    async fn history_for_demand(&self, demand_id: DemandId) -> Result<Vec<Metaspec>, StoreError>;
}

/// Checkpoint persistence operations
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// Persist a new checkpoint
    ///
    /// # Errors
    /// `StoreError::Duplicate` if a checkpoint with the same id exists.
    async fn create(&self, checkpoint: &Checkpoint) -> Result<(), StoreError>;

    /// Retrieve a checkpoint by id
    async fn get(&self, id: CheckpointId) -> Result<Option<Checkpoint>, StoreError>;

    /// Replace an existing checkpoint
    ///
    /// # Errors
    /// `StoreError::NotFound` if the checkpoint does not exist.
    async fn update(&self, checkpoint: &Checkpoint) -> Result<(), StoreError>;

    /// Remove a checkpoint
    ///
    /// # Errors
    /// `StoreError::NotFound` if the checkpoint does not exist.
    async fn delete(&self, id: CheckpointId) -> Result<(), StoreError>;

    /// Most recent checkpoint of a demand
    async fn latest_for_demand(
        &self,
        demand_id: DemandId,
    ) -> Result<Option<Checkpoint>, StoreError>;
}
