//! Error types for the storage layer
//!
//! Covers the failures the repository ports surface:
//! - Unique-index violations on insert
//! - Updates or deletes against a missing id
//! - Stored documents that no longer map onto an entity
//! - Driver/server errors passed through

use mongodb::error::{ErrorKind, WriteFailure};

const DUPLICATE_KEY: i32 = 11000;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An entity with the same id already exists
    #[error("duplicate {entity} id: {id}")]
    Duplicate {
        /// Aggregate name
        entity: &'static str,
        /// Offending id
        id: String,
    },

    /// No entity with the given id
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Aggregate name
        entity: &'static str,
        /// Missing id
        id: String,
    },

    /// Stored document cannot be mapped back onto an entity
    #[error("malformed document in {collection}: {reason}")]
    Malformed {
        /// Collection name
        collection: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Driver or server error
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl StoreError {
    /// Check if error is a duplicate-id violation
    #[inline]
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Check if error is a missing-id failure
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Check whether a driver error is the server's duplicate-key error
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Server error code of a failed command, if any
pub(crate) fn command_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}
