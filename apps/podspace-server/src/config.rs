//! Server configuration from environment variables.
//!
//! ```bash
//! # Public base URL used in invitation links and redirects
//! PODSPACE_BASE_URL=https://podspace.example.com
//!
//! # Invitation lifetime in days (default 7)
//! PODSPACE_INVITE_TTL_DAYS=7
//! ```
//!
//! The listen address and database URL are CLI concerns (see `main.rs`).

use std::env;
use thiserror::Error;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Public base URL the invitation redirect flow points back at.
    pub base_url: String,
    /// How long an invitation stays redeemable.
    pub invite_ttl_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            invite_ttl_days: 7,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PODSPACE_INVITE_TTL_DAYS: {0}. Expected a positive integer")]
    InvalidInviteTtl(String),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = env::var("PODSPACE_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let invite_ttl_days = match env::var("PODSPACE_INVITE_TTL_DAYS") {
            Ok(v) => match v.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => return Err(ConfigError::InvalidInviteTtl(v)),
            },
            Err(_) => defaults.invite_ttl_days,
        };

        Ok(Self {
            base_url,
            invite_ttl_days,
        })
    }
}
