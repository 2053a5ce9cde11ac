use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ConfigError;

/// Environment variable the platform sets with the queue destination
pub const QUEUE_URL_ENV: &str = "QUEUE_URL";
/// Environment variable the platform sets with the HTTP endpoint
pub const API_GATEWAY_URL_ENV: &str = "API_GATEWAY_URL";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub village: VillageConfig,
    #[serde(default)]
    pub tower: TowerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Relay-to-queue settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VillageConfig {
    /// Queue the stamped document is published to
    pub queue_url: Option<String>,
}

impl VillageConfig {
    /// Queue destination, or `ConfigError::Missing` when unset
    pub fn require_queue_url(&self) -> Result<&str, ConfigError> {
        self.queue_url
            .as_deref()
            .ok_or(ConfigError::Missing(QUEUE_URL_ENV))
    }
}

/// Relay-to-endpoint settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TowerConfig {
    /// Endpoint every queued message is POSTed to
    pub api_gateway_url: Option<String>,
    #[serde(default)]
    pub http: HttpSettings,
}

impl TowerConfig {
    /// Endpoint URL, or `ConfigError::Missing` when unset
    pub fn require_api_gateway_url(&self) -> Result<&str, ConfigError> {
        self.api_gateway_url
            .as_deref()
            .ok_or(ConfigError::Missing(API_GATEWAY_URL_ENV))
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// Stays under the 30s function timeout the relays are deployed with
fn default_request_timeout_secs() -> u64 {
    25
}

fn default_user_agent() -> String {
    concat!("seven-seas/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Storage provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    #[default]
    S3,
    Memory,
}

/// Storage configuration
///
/// Credentials are never read from here: the S3 provider picks them up from
/// the standard `AWS_*` environment the function runs in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    pub region: Option<String>,
    /// Custom endpoint (LocalStack, MinIO)
    pub endpoint: Option<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.village.queue_url.is_none());
        assert!(config.tower.api_gateway_url.is_none());
        assert_eq!(config.tower.http.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.tower.http.request_timeout(), Duration::from_secs(25));
        assert!(config.tower.http.user_agent.starts_with("seven-seas/"));
        assert_eq!(config.storage.provider, StorageProvider::S3);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_require_missing_destinations() {
        let config = Config::default();

        assert!(matches!(
            config.village.require_queue_url(),
            Err(ConfigError::Missing(QUEUE_URL_ENV))
        ));
        assert!(matches!(
            config.tower.require_api_gateway_url(),
            Err(ConfigError::Missing(API_GATEWAY_URL_ENV))
        ));
    }

    #[test]
    fn test_require_present_destination() {
        let village = VillageConfig {
            queue_url: Some("https://sqs.us-west-2.amazonaws.com/123/AdventureQueue".to_string()),
        };

        assert_eq!(
            village.require_queue_url().unwrap(),
            "https://sqs.us-west-2.amazonaws.com/123/AdventureQueue"
        );
    }
}
