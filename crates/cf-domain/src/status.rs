//! Demand workflow status
//!
//! Demands move through a linear delivery workflow:
//! draft -> spec_approved -> architecture_done -> code_complete -> pr_merged
//!
//! Only the immediate successor is a legal transition target, and
//! `pr_merged` is terminal.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Status of a demand in the delivery workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandStatus {
    /// Initial state, demand is being drafted
    Draft,
    /// Specification reviewed and approved
    SpecApproved,
    /// Architecture design completed
    ArchitectureDone,
    /// Implementation finished
    CodeComplete,
    /// Pull request merged, demand delivered
    PrMerged,
}

impl DemandStatus {
    /// All statuses in workflow order
    pub const ALL: [DemandStatus; 5] = [
        DemandStatus::Draft,
        DemandStatus::SpecApproved,
        DemandStatus::ArchitectureDone,
        DemandStatus::CodeComplete,
        DemandStatus::PrMerged,
    ];

    /// Next status in the linear sequence, `None` once delivered
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            DemandStatus::Draft => Some(DemandStatus::SpecApproved),
            DemandStatus::SpecApproved => Some(DemandStatus::ArchitectureDone),
            DemandStatus::ArchitectureDone => Some(DemandStatus::CodeComplete),
            DemandStatus::CodeComplete => Some(DemandStatus::PrMerged),
            DemandStatus::PrMerged => None,
        }
    }

    /// Check if a transition to `target` is allowed (immediate successor only)
    #[inline]
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Check if this is the terminal workflow status
    #[inline]
    #[must_use]
    pub fn is_final(self) -> bool {
        self == DemandStatus::PrMerged
    }

    /// Wire representation of the status
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DemandStatus::Draft => "draft",
            DemandStatus::SpecApproved => "spec_approved",
            DemandStatus::ArchitectureDone => "architecture_done",
            DemandStatus::CodeComplete => "code_complete",
            DemandStatus::PrMerged => "pr_merged",
        }
    }
}

impl Default for DemandStatus {
    fn default() -> Self {
        DemandStatus::Draft
    }
}

impl std::fmt::Display for DemandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DemandStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DemandStatus::Draft),
            "spec_approved" => Ok(DemandStatus::SpecApproved),
            "architecture_done" => Ok(DemandStatus::ArchitectureDone),
            "code_complete" => Ok(DemandStatus::CodeComplete),
            "pr_merged" => Ok(DemandStatus::PrMerged),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn next_follows_workflow_sequence() {
        assert_eq!(DemandStatus::Draft.next(), Some(DemandStatus::SpecApproved));
        assert_eq!(
            DemandStatus::SpecApproved.next(),
            Some(DemandStatus::ArchitectureDone)
        );
        assert_eq!(
            DemandStatus::ArchitectureDone.next(),
            Some(DemandStatus::CodeComplete)
        );
        assert_eq!(
            DemandStatus::CodeComplete.next(),
            Some(DemandStatus::PrMerged)
        );
    }

    #[test]
    fn next_is_none_for_final_status() {
        assert_eq!(DemandStatus::PrMerged.next(), None);
    }

    #[test]
    fn can_transition_to_immediate_successor() {
        assert!(DemandStatus::Draft.can_transition_to(DemandStatus::SpecApproved));
        assert!(DemandStatus::CodeComplete.can_transition_to(DemandStatus::PrMerged));
    }

    #[test]
    fn cannot_skip_statuses() {
        assert!(!DemandStatus::Draft.can_transition_to(DemandStatus::ArchitectureDone));
        assert!(!DemandStatus::Draft.can_transition_to(DemandStatus::CodeComplete));
        assert!(!DemandStatus::Draft.can_transition_to(DemandStatus::PrMerged));
        assert!(!DemandStatus::SpecApproved.can_transition_to(DemandStatus::CodeComplete));
    }

    #[test]
    fn cannot_transition_backwards() {
        assert!(!DemandStatus::SpecApproved.can_transition_to(DemandStatus::Draft));
        assert!(!DemandStatus::PrMerged.can_transition_to(DemandStatus::Draft));
        assert!(!DemandStatus::PrMerged.can_transition_to(DemandStatus::SpecApproved));
    }

    #[test]
    fn only_pr_merged_is_final() {
        assert!(!DemandStatus::Draft.is_final());
        assert!(!DemandStatus::SpecApproved.is_final());
        assert!(!DemandStatus::ArchitectureDone.is_final());
        assert!(!DemandStatus::CodeComplete.is_final());
        assert!(DemandStatus::PrMerged.is_final());
    }

    #[test]
    fn string_round_trip() {
        for status in DemandStatus::ALL {
            assert_eq!(DemandStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = DemandStatus::from_str("in_review").unwrap_err();
        assert!(matches!(err, DomainError::UnknownStatus(_)));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&DemandStatus::SpecApproved).unwrap();
        assert_eq!(json, "\"spec_approved\"");
        let back: DemandStatus = serde_json::from_str("\"pr_merged\"").unwrap();
        assert_eq!(back, DemandStatus::PrMerged);
    }
}
