//! Project payload schema

use crate::error::SchemaError;
use crate::require_chars;
use cf_domain::{ContextBudget, ProjectId};
use serde::Deserialize;
use std::str::FromStr;

/// Name length bounds in characters
pub const NAME_MIN: usize = 3;
/// Upper name bound
pub const NAME_MAX: usize = 100;

/// Untrusted project payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    /// Project identifier (UUID string)
    pub id: String,
    /// Project name
    pub name: String,
    /// Owning user identifier
    #[serde(alias = "userId")]
    pub user_id: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional context budget
    #[serde(default, alias = "contextBudget")]
    pub context_budget: Option<BudgetInput>,
}

/// Untrusted budget subdocument
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BudgetInput {
    /// Maximum tokens allocated
    #[serde(alias = "maxTokens")]
    pub max_tokens: u64,
    /// Tokens already consumed
    #[serde(default, alias = "usedTokens")]
    pub used_tokens: u64,
}

impl From<BudgetInput> for ContextBudget {
    fn from(input: BudgetInput) -> Self {
        ContextBudget::with_usage(input.max_tokens, input.used_tokens)
    }
}

/// Validated project payload
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    /// Typed project identifier
    pub id: ProjectId,
    /// Project name, 3-100 characters
    pub name: String,
    /// Owning user identifier
    pub user_id: String,
    /// Description, empty when absent
    pub description: String,
    /// Context budget when supplied
    pub context_budget: Option<ContextBudget>,
}

/// Schema validating project payloads
#[derive(Debug, Clone, Copy)]
pub struct ProjectSchema;

impl ProjectSchema {
    /// Validate an untrusted payload into a [`ProjectRecord`]
    ///
    /// # Errors
    /// The first violated constraint, naming the offending field.
    pub fn validate(input: ProjectInput) -> Result<ProjectRecord, SchemaError> {
        let id =
            ProjectId::from_str(input.id.trim()).map_err(|_| SchemaError::InvalidId { field: "id" })?;

        require_chars("name", &input.name, NAME_MIN, NAME_MAX)?;

        if input.user_id.trim().is_empty() {
            return Err(SchemaError::Missing { field: "user_id" });
        }

        Ok(ProjectRecord {
            id,
            name: input.name,
            user_id: input.user_id,
            description: input.description.unwrap_or_default(),
            context_budget: input.context_budget.map(Into::into),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(name: &str) -> ProjectInput {
        ProjectInput {
            id: "8e2b86f4-6f3a-4b8e-9f2f-0a1b2c3d4e5f".to_string(),
            name: name.to_string(),
            user_id: "user_123".to_string(),
            description: None,
            context_budget: None,
        }
    }

    #[test]
    fn minimal_valid_payload_passes() {
        let record = ProjectSchema::validate(input("My Project")).unwrap();
        assert_eq!(record.name, "My Project");
        assert_eq!(record.user_id, "user_123");
        assert_eq!(record.description, "");
        assert!(record.context_budget.is_none());
    }

    #[test]
    fn name_length_boundaries() {
        assert!(ProjectSchema::validate(input("ab")).is_err());
        assert!(ProjectSchema::validate(input("abc")).is_ok());
        assert!(ProjectSchema::validate(input(&"x".repeat(100))).is_ok());

        let err = ProjectSchema::validate(input(&"x".repeat(101))).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TooLong {
                field: "name",
                max: NAME_MAX,
                actual: 101,
            }
        );
    }

    #[test]
    fn bad_id_is_rejected() {
        let mut payload = input("My Project");
        payload.id = "proj-1".to_string();
        let err = ProjectSchema::validate(payload).unwrap_err();
        assert_eq!(err, SchemaError::InvalidId { field: "id" });
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let mut payload = input("My Project");
        payload.user_id = "  ".to_string();
        let err = ProjectSchema::validate(payload).unwrap_err();
        assert_eq!(err, SchemaError::Missing { field: "user_id" });
    }

    #[test]
    fn budget_is_carried_through() {
        let mut payload = input("My Project");
        payload.context_budget = Some(BudgetInput {
            max_tokens: 100_000,
            used_tokens: 2_500,
        });
        let record = ProjectSchema::validate(payload).unwrap();
        assert_eq!(
            record.context_budget,
            Some(ContextBudget::with_usage(100_000, 2_500))
        );
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let payload: ProjectInput = serde_json::from_str(
            r#"{
                "id": "8e2b86f4-6f3a-4b8e-9f2f-0a1b2c3d4e5f",
                "name": "Frontend payload",
                "userId": "user_9",
                "contextBudget": {"maxTokens": 1000}
            }"#,
        )
        .unwrap();
        let record = ProjectSchema::validate(payload).unwrap();
        assert_eq!(record.user_id, "user_9");
        assert_eq!(record.context_budget, Some(ContextBudget::new(1000)));
    }
}
