//! In-memory adapters
//!
//! `DashMap`-backed implementations of the repository ports with the same
//! semantics as the MongoDB adapters (duplicate detection, not-found on
//! update/delete, sorted listing queries). Used by unit tests and local
//! development without a server.

use crate::error::StoreError;
use crate::repository::{
    CheckpointRepository, DemandRepository, MetaspecRepository, ProjectRepository,
};
use async_trait::async_trait;
use cf_domain::{
    Checkpoint, CheckpointId, Demand, DemandId, DemandStatus, Metaspec, MetaspecId, Project,
    ProjectId,
};
use dashmap::DashMap;

/// In-memory implementation of [`ProjectRepository`]
#[derive(Debug, Default)]
pub struct MemoryProjectRepository {
    items: DashMap<ProjectId, Project>,
}

impl MemoryProjectRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn create(&self, project: &Project) -> Result<(), StoreError> {
        if self.items.contains_key(&project.id) {
            return Err(StoreError::Duplicate {
                entity: "project",
                id: project.id.to_string(),
            });
        }
        self.items.insert(project.id, project.clone());
        Ok(())
    }

    async fn get(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, project: &Project) -> Result<(), StoreError> {
        if !self.items.contains_key(&project.id) {
            return Err(StoreError::NotFound {
                entity: "project",
                id: project.id.to_string(),
            });
        }
        self.items.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> Result<(), StoreError> {
        if self.items.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                entity: "project",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        let mut projects: Vec<Project> = self
            .items
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }
}

/// In-memory implementation of [`DemandRepository`]
#[derive(Debug, Default)]
pub struct MemoryDemandRepository {
    items: DashMap<DemandId, Demand>,
}

impl MemoryDemandRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(&self, filter: impl Fn(&Demand) -> bool) -> Vec<Demand> {
        let mut demands: Vec<Demand> = self
            .items
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        demands.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        demands
    }
}

#[async_trait]
impl DemandRepository for MemoryDemandRepository {
    async fn create(&self, demand: &Demand) -> Result<(), StoreError> {
        if self.items.contains_key(&demand.id) {
            return Err(StoreError::Duplicate {
                entity: "demand",
                id: demand.id.to_string(),
            });
        }
        self.items.insert(demand.id, demand.clone());
        Ok(())
    }

    async fn get(&self, id: DemandId) -> Result<Option<Demand>, StoreError> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, demand: &Demand) -> Result<(), StoreError> {
        if !self.items.contains_key(&demand.id) {
            return Err(StoreError::NotFound {
                entity: "demand",
                id: demand.id.to_string(),
            });
        }
        self.items.insert(demand.id, demand.clone());
        Ok(())
    }

    async fn delete(&self, id: DemandId) -> Result<(), StoreError> {
        if self.items.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                entity: "demand",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Demand>, StoreError> {
        Ok(self.collect_sorted(|demand| demand.project_id == project_id))
    }

    async fn list_for_project_with_status(
        &self,
        project_id: ProjectId,
        status: DemandStatus,
    ) -> Result<Vec<Demand>, StoreError> {
        Ok(self.collect_sorted(|demand| demand.project_id == project_id && demand.status == status))
    }
}

/// In-memory implementation of [`MetaspecRepository`]
#[derive(Debug, Default)]
pub struct MemoryMetaspecRepository {
    items: DashMap<MetaspecId, Metaspec>,
}

impl MemoryMetaspecRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetaspecRepository for MemoryMetaspecRepository {
    async fn create(&self, metaspec: &Metaspec) -> Result<(), StoreError> {
        if self.items.contains_key(&metaspec.id) {
            return Err(StoreError::Duplicate {
                entity: "metaspec",
                id: metaspec.id.to_string(),
            });
        }
        // mirror the unique (demand_id, version) index
        let version_taken = self.items.iter().any(|entry| {
            entry.demand_id == metaspec.demand_id && entry.version == metaspec.version
        });
        if version_taken {
            return Err(StoreError::Duplicate {
                entity: "metaspec",
                id: metaspec.id.to_string(),
            });
        }
        self.items.insert(metaspec.id, metaspec.clone());
        Ok(())
    }

    async fn get(&self, id: MetaspecId) -> Result<Option<Metaspec>, StoreError> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, metaspec: &Metaspec) -> Result<(), StoreError> {
        if !self.items.contains_key(&metaspec.id) {
            return Err(StoreError::NotFound {
                entity: "metaspec",
                id: metaspec.id.to_string(),
            });
        }
        self.items.insert(metaspec.id, metaspec.clone());
        Ok(())
    }

    async fn delete(&self, id: MetaspecId) -> Result<(), StoreError> {
        if self.items.remove(&id).is_none() {
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
        Ok(self
            .items
            .iter()
            .filter(|entry| entry.demand_id == demand_id)
            .max_by_key(|entry| entry.version)
            .map(|entry| entry.value().clone()))
    }

    async fn history_for_demand(&self, demand_id: DemandId) -> Result<Vec<Metaspec>, StoreError> {
        let mut metaspecs: Vec<Metaspec> = self
            .items
            .iter()
            .filter(|entry| entry.demand_id == demand_id)
            .map(|entry| entry.value().clone())
            .collect();
        metaspecs.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(metaspecs)
    }
}

/// In-memory implementation of [`CheckpointRepository`]
#[derive(Debug, Default)]
pub struct MemoryCheckpointRepository {
    items: DashMap<CheckpointId, Checkpoint>,
}

impl MemoryCheckpointRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointRepository for MemoryCheckpointRepository {
    async fn create(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        if self.items.contains_key(&checkpoint.id) {
            return Err(StoreError::Duplicate {
                entity: "checkpoint",
                id: checkpoint.id.to_string(),
            });
        }
        self.items.insert(checkpoint.id, checkpoint.clone());
        Ok(())
    }

    async fn get(&self, id: CheckpointId) -> Result<Option<Checkpoint>, StoreError> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        if !self.items.contains_key(&checkpoint.id) {
            return Err(StoreError::NotFound {
                entity: "checkpoint",
                id: checkpoint.id.to_string(),
            });
        }
        self.items.insert(checkpoint.id, checkpoint.clone());
        Ok(())
    }

    async fn delete(&self, id: CheckpointId) -> Result<(), StoreError> {
        if self.items.remove(&id).is_none() {
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
        Ok(self
            .items
            .iter()
            .filter(|entry| entry.demand_id == demand_id)
            .max_by_key(|entry| entry.created_at)
            .map(|entry| entry.value().clone()))
    }
}
