//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Ed25519 public key used to verify access tokens (PEM, base64-encoded)
    pub jwt_public_key: String,

    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").context("JWT_PUBLIC_KEY must be set")?,
            log_filter: env::var("LOG_FILTER")
                .unwrap_or_else(|_| "ipm_server=debug,tower_http=debug".into()),
        })
    }

    /// Create a configuration for testing that trusts `jwt_public_key`.
    #[must_use]
    pub fn for_test(jwt_public_key: impl Into<String>) -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            jwt_public_key: jwt_public_key.into(),
            log_filter: "ipm_server=debug".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_test_trusts_given_key() {
        let config = Config::for_test("cHVibGlj");
        assert_eq!(config.jwt_public_key, "cHVibGlj");
        assert_eq!(config.bind_address, "127.0.0.1:8080");
    }
}
