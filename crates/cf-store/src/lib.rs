//! MongoDB persistence for Context First
//!
//! Provides the storage layer of the platform:
//! - Repository ports for the four aggregates
//! - MongoDB adapters with document mapping
//! - An in-memory adapter for tests and local development
//! - Database provisioning (collections, validators, indexes, app user)
//!
//! Connection configuration comes from the environment with local
//! development fallbacks, see [`StoreConfig`].

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod provision;
pub mod repository;

pub use config::StoreConfig;
pub use error::StoreError;
pub use mongo::MongoStore;
pub use provision::{ProvisionPlan, ProvisionReport};
pub use repository::{
    CheckpointRepository, DemandRepository, MetaspecRepository, ProjectRepository,
};

/// Collection names shared by the adapters and the provisioner
pub mod collections {
    /// Projects collection
    pub const PROJECTS: &str = "projects";
    /// Demands collection
    pub const DEMANDS: &str = "demands";
    /// Metaspecs collection
    pub const METASPECS: &str = "metaspecs";
    /// Checkpoints collection
    pub const CHECKPOINTS: &str = "checkpoints";
}
