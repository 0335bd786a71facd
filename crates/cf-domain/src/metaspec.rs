//! Metaspec entity
//!
//! A metaspec is a versioned Markdown specification attached to a demand,
//! written from one of three perspectives: business requirements, technical
//! specification, or architecture design.

use crate::error::DomainError;
use crate::ids::{DemandId, MetaspecId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Perspective a metaspec is written from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaspecKind {
    /// Business requirements (product perspective)
    Business,
    /// Technical specification (tech-lead perspective)
    Technical,
    /// Architecture design (architect perspective)
    Architecture,
}

impl MetaspecKind {
    /// All metaspec kinds
    pub const ALL: [MetaspecKind; 3] = [
        MetaspecKind::Business,
        MetaspecKind::Technical,
        MetaspecKind::Architecture,
    ];

    /// Wire representation of the kind
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetaspecKind::Business => "business",
            MetaspecKind::Technical => "technical",
            MetaspecKind::Architecture => "architecture",
        }
    }
}

impl std::fmt::Display for MetaspecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetaspecKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(MetaspecKind::Business),
            "technical" => Ok(MetaspecKind::Technical),
            "architecture" => Ok(MetaspecKind::Architecture),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}

/// Versioned specification document attached to a demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metaspec {
    /// Metaspec identifier
    pub id: MetaspecId,
    /// Demand this metaspec belongs to
    pub demand_id: DemandId,
    /// Perspective the document is written from
    pub kind: MetaspecKind,
    /// Markdown content
    pub content: String,
    /// Version number, starts at 1
    pub version: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp, absent until first mutation
    pub updated_at: Option<DateTime<Utc>>,
}

impl Metaspec {
    /// Create a new metaspec at version 1
    ///
    /// # Errors
    /// `DomainError::InvalidMetaspec` if the content is blank or carries
    /// no Markdown heading.
    pub fn new(
        demand_id: DemandId,
        kind: MetaspecKind,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        Ok(Self {
            id: MetaspecId::new(),
            demand_id,
            kind,
            content,
            version: 1,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Replace the content and bump the version
    ///
    /// # Errors
    /// `DomainError::InvalidMetaspec` if the new content fails validation.
    pub fn revise(&mut self, content: impl Into<String>) -> Result<(), DomainError> {
        let content = content.into();
        Self::validate_content(&content)?;

        self.content = content;
        self.bump_version();
        Ok(())
    }

    /// Increment the version, touching `updated_at`
    pub fn bump_version(&mut self) {
        self.version += 1;
        self.updated_at = Some(Utc::now());
    }

    /// Check whether `content` carries at least one Markdown heading
    #[must_use]
    pub fn has_heading(content: &str) -> bool {
        content.lines().any(|line| {
            let trimmed = line.trim_start();
            let level = trimmed.chars().take_while(|&c| c == '#').count();
            (1..=6).contains(&level)
        })
    }

    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::InvalidMetaspec(
                "content cannot be empty".to_string(),
            ));
        }
        if !Self::has_heading(content) {
            return Err(DomainError::InvalidMetaspec(
                "content must contain a Markdown heading".to_string(),
            ));
        }
        Ok(())
    }
}
