//! Storage configuration
//!
//! Sourced from the environment with the local docker-compose development
//! setup as fallback. The application credential is what `init-db`
//! provisions; production deployments must override the password.

use std::env;

/// MongoDB connection and provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection string
    pub uri: String,
    /// Database name
    pub database: String,
    /// Application user provisioned by `init-db`
    pub app_user: String,
    /// Application user password
    pub app_password: String,
}

impl StoreConfig {
    /// Build from the environment, falling back to the local dev setup
    ///
    /// Reads `MONGODB_URI`, `MONGODB_DATABASE`, `MONGODB_APP_USER`,
    /// `MONGODB_APP_PASSWORD`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            uri: env::var("MONGODB_URI").unwrap_or(defaults.uri),
            database: env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
            app_user: env::var("MONGODB_APP_USER").unwrap_or(defaults.app_user),
            app_password: env::var("MONGODB_APP_PASSWORD").unwrap_or(defaults.app_password),
        }
    }

    /// With a different connection string
    #[inline]
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// With a different database name
    #[inline]
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "context_first_dev".to_string(),
            app_user: "context_first_app".to_string(),
            app_password: "app_password_change_in_production".to_string(),
        }
    }
}
