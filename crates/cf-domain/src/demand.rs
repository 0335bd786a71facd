//! Demand entity
//!
//! A demand is a unit of development work moving through the linear
//! delivery workflow. Transitions only ever advance to the immediate
//! next status, and a delivered demand can no longer change.

use crate::budget::ContextBudget;
use crate::error::DomainError;
use crate::ids::{DemandId, ProjectId};
use crate::status::DemandStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Development demand tracked through the delivery workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    /// Demand identifier
    pub id: DemandId,
    /// Project this demand belongs to
    pub project_id: ProjectId,
    /// Short title
    pub title: String,
    /// Detailed description
    pub description: String,
    /// Current workflow status
    pub status: DemandStatus,
    /// Optional demand-scoped token budget
    pub context_budget: Option<ContextBudget>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp, absent until first mutation
    pub updated_at: Option<DateTime<Utc>>,
}

impl Demand {
    /// Create a new demand in `draft`
    ///
    /// # Errors
    /// `DomainError::BlankField` if `title` is blank.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::BlankField { field: "title" });
        }

        Ok(Self {
            id: DemandId::new(),
            project_id,
            title,
            description: description.into(),
            status: DemandStatus::Draft,
            context_budget: None,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// With a demand-scoped budget
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = Some(budget);
        self
    }

    /// Check whether a transition to `target` is allowed from the current status
    #[inline]
    #[must_use]
    pub fn can_transition_to(&self, target: DemandStatus) -> bool {
        self.status.can_transition_to(target)
    }

    /// Transition the demand to `target`
    ///
    /// # Errors
    /// - `DomainError::DemandCompleted` if the demand is already delivered
    /// - `DomainError::InvalidTransition` if `target` is not the immediate successor
    pub fn transition_to(&mut self, target: DemandStatus) -> Result<(), DomainError> {
        if self.status.is_final() {
            return Err(DomainError::DemandCompleted {
                title: self.title.clone(),
            });
        }

        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Advance to the next workflow status, returning the new status
    ///
    /// # Errors
    /// `DomainError::DemandCompleted` if the demand is already delivered.
    pub fn advance(&mut self) -> Result<DemandStatus, DomainError> {
        let next = self.status.next().ok_or_else(|| DomainError::DemandCompleted {
            title: self.title.clone(),
        })?;

        self.status = next;
        self.updated_at = Some(Utc::now());
        Ok(next)
    }

    /// Check whether the demand has been delivered
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_final()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_demand() -> Demand {
        Demand::new(
            ProjectId::new(),
            "Implement login flow",
            "OAuth2 login with session cookies",
        )
        .unwrap()
    }

    #[test]
    fn new_demand_starts_in_draft() {
        let demand = sample_demand();
        assert_eq!(demand.status, DemandStatus::Draft);
        assert!(demand.context_budget.is_none());
        assert!(demand.updated_at.is_none());
        assert!(!demand.is_completed());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Demand::new(ProjectId::new(), "  ", "desc").unwrap_err();
        assert_eq!(err, DomainError::BlankField { field: "title" });
    }

    #[test]
    fn with_budget_attaches_budget() {
        let demand = sample_demand().with_budget(ContextBudget::new(50_000));
        assert_eq!(demand.context_budget, Some(ContextBudget::new(50_000)));
    }

    #[test]
    fn transition_to_next_status_succeeds() {
        let mut demand = sample_demand();
        demand.transition_to(DemandStatus::SpecApproved).unwrap();
        assert_eq!(demand.status, DemandStatus::SpecApproved);
        assert!(demand.updated_at.is_some());
    }

    #[test]
    fn transition_skipping_status_is_rejected() {
        let mut demand = sample_demand();
        let err = demand.transition_to(DemandStatus::CodeComplete).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: DemandStatus::Draft,
                to: DemandStatus::CodeComplete,
            }
        );
        assert_eq!(demand.status, DemandStatus::Draft);
    }

    #[test]
    fn completed_demand_rejects_transitions() {
        let mut demand = sample_demand();
        while !demand.is_completed() {
            demand.advance().unwrap();
        }

        let err = demand.transition_to(DemandStatus::Draft).unwrap_err();
        assert!(matches!(err, DomainError::DemandCompleted { .. }));
    }

    #[test]
    fn advance_walks_the_full_workflow() {
        let mut demand = sample_demand();

        assert_eq!(demand.advance().unwrap(), DemandStatus::SpecApproved);
        assert_eq!(demand.advance().unwrap(), DemandStatus::ArchitectureDone);
        assert_eq!(demand.advance().unwrap(), DemandStatus::CodeComplete);
        assert_eq!(demand.advance().unwrap(), DemandStatus::PrMerged);
        assert!(demand.is_completed());

        let err = demand.advance().unwrap_err();
        assert!(matches!(err, DomainError::DemandCompleted { .. }));
    }
}
