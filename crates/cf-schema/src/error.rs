//! Validation errors with the offending field and constraint

/// Schema validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Required field missing or empty
    #[error("{field} is required")]
    Missing {
        /// Field name
        field: &'static str,
    },

    /// Field shorter than the minimum length
    #[error("{field} must be at least {min} characters, got {actual}")]
    TooShort {
        /// Field name
        field: &'static str,
        /// Minimum length in characters
        min: usize,
        /// Actual length in characters
        actual: usize,
    },

    /// Field longer than the maximum length
    #[error("{field} must be at most {max} characters, got {actual}")]
    TooLong {
        /// Field name
        field: &'static str,
        /// Maximum length in characters
        max: usize,
        /// Actual length in characters
        actual: usize,
    },

    /// Field is not a valid UUID
    #[error("{field} must be a valid UUID")]
    InvalidId {
        /// Field name
        field: &'static str,
    },

    /// Field violates a domain constraint
    #[error("{field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Constraint description
        reason: String,
    },
}

impl SchemaError {
    /// Field the error is about
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidId { field }
            | Self::Invalid { field, .. } => field,
        }
    }
}
