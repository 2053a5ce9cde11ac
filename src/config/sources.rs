use super::models::{API_GATEWAY_URL_ENV, Config, QUEUE_URL_ENV};
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "SEVEN_SEAS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/seven_seas.toml";
const ENV_PREFIX: &str = "SEVEN_SEAS";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. `SEVEN_SEAS__*` environment variables
/// 5. Platform variables `QUEUE_URL` / `API_GATEWAY_URL` (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let mut config = load_from_sources(config_path())?;
    apply_platform_overrides(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Path of the TOML file `load` reads
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Apply the destinations the hosting platform injects into the function
/// environment. Empty values count as unset.
pub fn apply_platform_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(queue_url) = lookup(QUEUE_URL_ENV) {
        config.village.queue_url = Some(queue_url);
    }
    if let Some(api_url) = lookup(API_GATEWAY_URL_ENV) {
        config.tower.api_gateway_url = Some(api_url);
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    // Missing file is fine: defaults plus environment
    if config_path.exists() {
        builder = builder.add_source(File::from(config_path).required(false));
    }

    // SEVEN_SEAS__TOWER__API_GATEWAY_URL -> tower.api_gateway_url
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
