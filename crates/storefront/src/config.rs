//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COAST_CATALOG_URL` - URL of the catalog JSON document
//!
//! ## Optional
//! - `COAST_HOST` - Bind address (default: 127.0.0.1)
//! - `COAST_PORT` - Listen port (default: 3000)
//! - `COAST_CART_PATH` - Path of the persisted cart file (default: data/cart.json)
//! - `COAST_ASSETS_DIR` - Directory served under /assets (default: crates/storefront/assets)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// URL of the catalog JSON document
    pub catalog_url: String,
    /// Path of the persisted cart file
    pub cart_path: PathBuf,
    /// Directory served under `/assets`
    pub assets_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Separated from [`Self::from_env`] so tests can supply variables
    /// without mutating the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match var("COAST_HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::InvalidEnvVar("COAST_HOST".into(), e.to_string()))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match var("COAST_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("COAST_PORT".into(), e.to_string()))?,
            None => 3000,
        };

        let catalog_url = var("COAST_CATALOG_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("COAST_CATALOG_URL".into()))?;
        url::Url::parse(&catalog_url)
            .map_err(|e| ConfigError::InvalidEnvVar("COAST_CATALOG_URL".into(), e.to_string()))?;

        let cart_path = var("COAST_CART_PATH").map_or_else(|| PathBuf::from("data/cart.json"), PathBuf::from);

        let assets_dir = var("COAST_ASSETS_DIR")
            .map_or_else(|| PathBuf::from("crates/storefront/assets"), PathBuf::from);

        Ok(Self {
            host,
            port,
            catalog_url,
            cart_path,
            assets_dir,
            sentry_dsn: var("SENTRY_DSN"),
            sentry_environment: var("SENTRY_ENVIRONMENT"),
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
