//! Shared data-validation schemas
//!
//! Validates untrusted payloads (deserialized JSON from the frontend or
//! API clients) into typed values the rest of the platform can trust.
//! Each schema exposes a single `validate` operation that either produces
//! a typed record or a field-level [`SchemaError`].
//!
//! Length constraints count characters, not bytes.

#![warn(unreachable_pub)]

pub mod demand;
pub mod error;
pub mod metaspec;
pub mod project;

pub use demand::{DemandInput, DemandRecord, DemandSchema};
pub use error::SchemaError;
pub use metaspec::{MetaspecInput, MetaspecRecord, MetaspecSchema};
pub use project::{BudgetInput, ProjectInput, ProjectRecord, ProjectSchema};

pub(crate) fn require_chars(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), SchemaError> {
    let actual = value.chars().count();
    if actual < min {
        return Err(SchemaError::TooShort { field, min, actual });
    }
    if actual > max {
        return Err(SchemaError::TooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_counting_is_not_byte_counting() {
        // 3 characters, 9 bytes
        assert!(require_chars("name", "äöü", 3, 100).is_ok());
        assert!(require_chars("name", "äö", 3, 100).is_err());
    }
}
