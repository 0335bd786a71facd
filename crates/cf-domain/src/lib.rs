//! Context First domain model
//!
//! The business core of the platform:
//! - Projects that group development demands and carry a context budget
//! - Demands moving through the linear delivery workflow
//! - Versioned metaspecs attached to demands
//! - Expiring conversation checkpoints
//!
//! Entities validate their invariants on construction and expose the state
//! changes the workflow allows. Persistence and transport live elsewhere.

#![warn(unreachable_pub)]

pub mod budget;
pub mod checkpoint;
pub mod demand;
pub mod error;
pub mod ids;
pub mod metaspec;
pub mod project;
pub mod status;

// Re-exports for convenience
pub use budget::ContextBudget;
pub use checkpoint::Checkpoint;
pub use demand::Demand;
pub use error::DomainError;
pub use ids::{CheckpointId, DemandId, MetaspecId, ProjectId};
pub use metaspec::{Metaspec, MetaspecKind};
pub use project::Project;
pub use status::DemandStatus;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the domain model
    pub use crate::{
        Checkpoint, CheckpointId, ContextBudget, Demand, DemandId, DemandStatus, DomainError,
        Metaspec, MetaspecId, MetaspecKind, Project, ProjectId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
