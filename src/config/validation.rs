use super::models::Config;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: &'static str },

    #[error("tower.http.user_agent must not be empty")]
    EmptyUserAgent,
}

/// Validate the entire configuration
///
/// Missing destinations are accepted here; handlers report them per event.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_destinations(config)?;
    validate_http(config)?;
    Ok(())
}

fn validate_destinations(config: &Config) -> Result<(), ValidationError> {
    if let Some(ref url) = config.village.queue_url {
        validate_url("village.queue_url", url)?;
    }
    if let Some(ref url) = config.tower.api_gateway_url {
        validate_url("tower.api_gateway_url", url)?;
    }
    if let Some(ref url) = config.storage.endpoint {
        validate_url("storage.endpoint", url)?;
    }
    Ok(())
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
    };

    let url = Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    let http = &config.tower.http;

    if http.connect_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "tower.http.connect_timeout_secs",
        });
    }
    if http.request_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "tower.http.request_timeout_secs",
        });
    }
    if http.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    Ok(())
}
