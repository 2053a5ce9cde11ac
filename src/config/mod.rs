//! Configuration management for the relay handlers
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//! 4. The destination variables the function platform injects (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use seven_seas::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Publishing to: {:?}", config.village.queue_url);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `SEVEN_SEAS__<section>__<key>`
//!
//! Examples:
//! - `SEVEN_SEAS__TOWER__HTTP__REQUEST_TIMEOUT_SECS=10`
//! - `SEVEN_SEAS__STORAGE__PROVIDER=memory`
//! - `SEVEN_SEAS__TELEMETRY__LOG_FORMAT=pretty`
//!
//! `QUEUE_URL` and `API_GATEWAY_URL` are read as-is and override
//! `village.queue_url` and `tower.api_gateway_url`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/seven_seas.toml`.
//! This can be overridden using the `SEVEN_SEAS_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    API_GATEWAY_URL_ENV, Config, HttpSettings, LogFormat, QUEUE_URL_ENV, StorageConfig,
    StorageProvider, TelemetryConfig, TowerConfig, VillageConfig,
};
pub use sources::{apply_platform_overrides, config_path};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - A configured URL or timeout is invalid
    ///
    /// Unset destinations are not an error at load time.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Platform variables are not applied, which keeps tests hermetic.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
