//! Metaspec payload schema

use crate::error::SchemaError;
use cf_domain::{DemandId, MetaspecId, MetaspecKind};
use serde::Deserialize;
use std::str::FromStr;

/// Untrusted metaspec payload
#[derive(Debug, Clone, Deserialize)]
pub struct MetaspecInput {
    /// Metaspec identifier (UUID string)
    pub id: String,
    /// Display name
    pub name: String,
    /// Markdown content
    pub content: String,
    /// Optional perspective kind
    #[serde(default)]
    pub kind: Option<String>,
    /// Optional version, must be at least 1 when supplied
    #[serde(default)]
    pub version: Option<u32>,
    /// Optional owning demand identifier
    #[serde(default, alias = "demandId")]
    pub demand_id: Option<String>,
}

/// Validated metaspec payload
#[derive(Debug, Clone, PartialEq)]
pub struct MetaspecRecord {
    /// Typed metaspec identifier
    pub id: MetaspecId,
    /// Display name
    pub name: String,
    /// Markdown content
    pub content: String,
    /// Perspective kind when supplied
    pub kind: Option<MetaspecKind>,
    /// Version, 1 when absent
    pub version: u32,
    /// Owning demand when supplied
    pub demand_id: Option<DemandId>,
}

/// Schema validating metaspec payloads
#[derive(Debug, Clone, Copy)]
pub struct MetaspecSchema;

impl MetaspecSchema {
    /// Validate an untrusted payload into a [`MetaspecRecord`]
    ///
    /// # Errors
    /// The first violated constraint, naming the offending field.
    pub fn validate(input: MetaspecInput) -> Result<MetaspecRecord, SchemaError> {
        let id = MetaspecId::from_str(input.id.trim())
            .map_err(|_| SchemaError::InvalidId { field: "id" })?;

        if input.name.trim().is_empty() {
            return Err(SchemaError::Missing { field: "name" });
        }
        if input.content.trim().is_empty() {
            return Err(SchemaError::Missing { field: "content" });
        }

        let kind = input
            .kind
            .as_deref()
            .map(|raw| {
                MetaspecKind::from_str(raw).map_err(|err| SchemaError::Invalid {
                    field: "kind",
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        let version = input.version.unwrap_or(1);
        if version < 1 {
            return Err(SchemaError::Invalid {
                field: "version",
                reason: "must be at least 1".to_string(),
            });
        }

        let demand_id = input
            .demand_id
            .as_deref()
            .map(|raw| {
                DemandId::from_str(raw.trim())
                    .map_err(|_| SchemaError::InvalidId { field: "demand_id" })
            })
            .transpose()?;

        Ok(MetaspecRecord {
            id,
            name: input.name,
            content: input.content,
            kind,
            version,
            demand_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input() -> MetaspecInput {
        MetaspecInput {
            id: "3f1a5b7c-9d0e-4f2a-b6c8-d0e1f2a3b4c5".to_string(),
            name: "Login business spec".to_string(),
            content: "# Login\n\nUsers sign in with OAuth2.".to_string(),
            kind: None,
            version: None,
            demand_id: None,
        }
    }

    #[test]
    fn minimal_valid_payload_passes() {
        let record = MetaspecSchema::validate(input()).unwrap();
        assert_eq!(record.version, 1);
        assert!(record.kind.is_none());
        assert!(record.demand_id.is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut payload = input();
        payload.name = " ".to_string();
        let err = MetaspecSchema::validate(payload).unwrap_err();
        assert_eq!(err, SchemaError::Missing { field: "name" });
    }

    #[test]
    fn blank_content_is_rejected() {
        let mut payload = input();
        payload.content = String::new();
        let err = MetaspecSchema::validate(payload).unwrap_err();
        assert_eq!(err, SchemaError::Missing { field: "content" });
    }

    #[test]
    fn zero_version_is_rejected() {
        let mut payload = input();
        payload.version = Some(0);
        let err = MetaspecSchema::validate(payload).unwrap_err();
        assert_eq!(err.field(), "version");
    }

    #[test]
    fn kind_is_parsed_when_supplied() {
        let mut payload = input();
        payload.kind = Some("architecture".to_string());
        let record = MetaspecSchema::validate(payload).unwrap();
        assert_eq!(record.kind, Some(MetaspecKind::Architecture));

        let mut payload = input();
        payload.kind = Some("legal".to_string());
        assert!(MetaspecSchema::validate(payload).is_err());
    }
}
