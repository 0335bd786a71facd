//! Runtime configuration for the HTTP surface
//!
//! Env-sourced with localhost fallbacks so a fresh checkout serves the
//! local frontend without any setup.

use std::env;
use std::net::SocketAddr;

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiConfigError {
    /// Bind address failed to parse
    #[error("invalid bind address: {0}")]
    InvalidBind(String),
}

/// HTTP surface configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address the server binds to
    pub bind: SocketAddr,
    /// Public base URL clients are told to reach the API on
    pub api_base: String,
    /// Frontend origin allowed by CORS
    pub frontend_origin: String,
}

impl ApiConfig {
    /// Build from the environment, falling back to local development values
    ///
    /// Reads `API_BIND`, `API_BASE_URL`, `FRONTEND_ORIGIN`.
    ///
    /// # Errors
    /// `ApiConfigError::InvalidBind` if `API_BIND` is not a socket address.
    pub fn from_env() -> Result<Self, ApiConfigError> {
        let defaults = Self::default();

        let bind = match env::var("API_BIND") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ApiConfigError::InvalidBind(raw))?,
            Err(_) => defaults.bind,
        };

        Ok(Self {
            bind,
            api_base: env::var("API_BASE_URL").unwrap_or(defaults.api_base),
            frontend_origin: env::var("FRONTEND_ORIGIN").unwrap_or(defaults.frontend_origin),
        })
    }

    /// With a different bind address
    #[inline]
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: ([127, 0, 0, 1], 8000).into(),
            api_base: "http://localhost:8000".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_serves_local_development() {
        let config = ApiConfig::default();
        assert_eq!(config.bind.port(), 8000);
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.frontend_origin, "http://localhost:3000");
    }

    #[test]
    fn with_bind_overrides_address() {
        let config = ApiConfig::default().with_bind(([0, 0, 0, 0], 9000).into());
        assert_eq!(config.bind.port(), 9000);
    }
}
