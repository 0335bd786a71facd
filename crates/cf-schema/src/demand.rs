//! Demand payload schema

use crate::error::SchemaError;
use crate::require_chars;
use cf_domain::{DemandId, DemandStatus, ProjectId};
use serde::Deserialize;
use std::str::FromStr;

/// Title length bounds in characters
pub const TITLE_MIN: usize = 5;
/// Upper title bound
pub const TITLE_MAX: usize = 200;
/// Minimum description length in characters
pub const DESCRIPTION_MIN: usize = 10;

/// Untrusted demand payload
#[derive(Debug, Clone, Deserialize)]
pub struct DemandInput {
    /// Demand identifier (UUID string)
    pub id: String,
    /// Short title
    pub title: String,
    /// Detailed description
    pub description: String,
    /// Optional owning project identifier
    #[serde(default, alias = "projectId")]
    pub project_id: Option<String>,
    /// Optional workflow status
    #[serde(default)]
    pub status: Option<String>,
}

/// Validated demand payload
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRecord {
    /// Typed demand identifier
    pub id: DemandId,
    /// Title, 5-200 characters
    pub title: String,
    /// Description, at least 10 characters
    pub description: String,
    /// Owning project when supplied
    pub project_id: Option<ProjectId>,
    /// Workflow status, `draft` when absent
    pub status: DemandStatus,
}

/// Schema validating demand payloads
#[derive(Debug, Clone, Copy)]
pub struct DemandSchema;

impl DemandSchema {
    /// Validate an untrusted payload into a [`DemandRecord`]
    ///
    /// # Errors
    /// The first violated constraint, naming the offending field.
    pub fn validate(input: DemandInput) -> Result<DemandRecord, SchemaError> {
        let id =
            DemandId::from_str(input.id.trim()).map_err(|_| SchemaError::InvalidId { field: "id" })?;

        require_chars("title", &input.title, TITLE_MIN, TITLE_MAX)?;
        require_chars("description", &input.description, DESCRIPTION_MIN, usize::MAX)?;

        let project_id = input
            .project_id
            .as_deref()
            .map(|raw| {
                ProjectId::from_str(raw.trim())
                    .map_err(|_| SchemaError::InvalidId { field: "project_id" })
            })
            .transpose()?;

        let status = input
            .status
            .as_deref()
            .map(|raw| {
                DemandStatus::from_str(raw).map_err(|err| SchemaError::Invalid {
                    field: "status",
                    reason: err.to_string(),
                })
            })
            .transpose()?
            .unwrap_or_default();

        Ok(DemandRecord {
            id,
            title: input.title,
            description: input.description,
            project_id,
            status,
        })
    }
}
