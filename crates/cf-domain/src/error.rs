//! Error types for the Context First domain
//!
//! Business-rule violations surfaced by entities and value objects:
//! - Context budget exhaustion
//! - Demand workflow violations
//! - Metaspec and checkpoint content rules

use crate::status::DemandStatus;

/// Domain error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Context budget cannot cover the requested tokens
    #[error("context budget exceeded: requested {requested}, {remaining} remaining")]
    BudgetExceeded {
        /// Tokens requested
        requested: u64,
        /// Tokens still available
        remaining: u64,
    },

    /// Workflow transition not allowed
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: DemandStatus,
        /// Requested status
        to: DemandStatus,
    },

    /// Demand is already in the final workflow status
    #[error("demand '{title}' already completed")]
    DemandCompleted {
        /// Title of the completed demand
        title: String,
    },

    /// Metaspec content rules violated
    #[error("invalid metaspec: {0}")]
    InvalidMetaspec(String),

    /// Checkpoint content rules violated
    #[error("invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    /// Required textual field is blank
    #[error("{field} cannot be blank")]
    BlankField {
        /// Field name
        field: &'static str,
    },

    /// Status string outside the workflow enumeration
    #[error("unknown demand status: {0}")]
    UnknownStatus(String),

    /// Metaspec kind string outside the enumeration
    #[error("unknown metaspec kind: {0}")]
    UnknownKind(String),
}

impl DomainError {
    /// Check if error is a workflow violation
    #[inline]
    #[must_use]
    pub fn is_workflow_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::DemandCompleted { .. }
        )
    }

    /// Check if error is a budget violation
    #[inline]
    #[must_use]
    pub fn is_budget_violation(&self) -> bool {
        matches!(self, Self::BudgetExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::BudgetExceeded {
            requested: 500,
            remaining: 100,
        };
        assert!(err.to_string().contains("context budget exceeded"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn workflow_violation_classification() {
        let err = DomainError::InvalidTransition {
            from: DemandStatus::Draft,
            to: DemandStatus::PrMerged,
        };
        assert!(err.is_workflow_violation());
        assert!(!err.is_budget_violation());

        let err = DomainError::BlankField { field: "name" };
        assert!(!err.is_workflow_violation());
    }
}
