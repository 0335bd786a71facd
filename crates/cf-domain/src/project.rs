//! Project entity
//!
//! A project groups related demands and owns the context budget they
//! draw from.

use crate::budget::ContextBudget;
use crate::error::DomainError;
use crate::ids::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project grouping related demands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: ProjectId,
    /// Project name
    pub name: String,
    /// Detailed description
    pub description: String,
    /// Identifier of the owning user
    pub owner_id: String,
    /// Token budget shared by the project's demands
    pub context_budget: ContextBudget,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp, absent until first mutation
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Create a new project
    ///
    /// # Errors
    /// `DomainError::BlankField` if `name` or `owner_id` is blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        owner_id: impl Into<String>,
        context_budget: ContextBudget,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::BlankField { field: "name" });
        }
        let owner_id = owner_id.into();
        if owner_id.trim().is_empty() {
            return Err(DomainError::BlankField { field: "owner_id" });
        }

        Ok(Self {
            id: ProjectId::new(),
            name,
            description: description.into(),
            owner_id,
            context_budget,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Check whether the project can consume `tokens` from its budget
    #[inline]
    #[must_use]
    pub fn can_consume_tokens(&self, tokens: u64) -> bool {
        self.context_budget.can_consume(tokens)
    }

    /// Consume tokens from the project budget
    ///
    /// # Errors
    /// `DomainError::BudgetExceeded` if the budget cannot cover `tokens`.
    pub fn consume_tokens(&mut self, tokens: u64) -> Result<(), DomainError> {
        self.context_budget = self.context_budget.consume(tokens)?;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Less than 10% of the budget remains
    #[inline]
    #[must_use]
    pub fn is_budget_critical(&self) -> bool {
        self.context_budget.is_critical()
    }

    /// Less than 30% of the budget remains
    #[inline]
    #[must_use]
    pub fn is_budget_warning(&self) -> bool {
        self.context_budget.is_warning()
    }
}
