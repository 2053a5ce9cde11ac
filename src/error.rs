use serde_json::{Value, json};
use thiserror::Error;

use crate::config::ConfigError;
use crate::delivery::DeliveryError;
use crate::messaging::MessagingError;
use crate::storage::StorageError;

/// Everything that can go wrong while relaying one event or record.
///
/// Handlers log these with full context and answer the caller with a
/// generic body only.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] StorageError),

    #[error("publish failed: {0}")]
    Publish(#[from] MessagingError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("unexpected event structure: {0}")]
    Structural(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

impl RelayError {
    pub fn structural(detail: impl Into<String>) -> Self {
        RelayError::Structural(detail.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            RelayError::Decode(_) | RelayError::Malformed(_) => "DECODE_ERROR",
            RelayError::Config(_) => "CONFIG_ERROR",
            RelayError::Fetch(_) => "FETCH_ERROR",
            RelayError::Publish(_) | RelayError::Delivery(_) => "DELIVERY_ERROR",
            RelayError::Structural(_) => "STRUCTURAL_ERROR",
        }
    }

    /// Body returned to the caller by the relay-to-queue handler
    ///
    /// Anything absent (event field, document field, queue setting) reads as a
    /// bad event structure; every other failure stays generic.
    pub fn public_body(&self) -> Value {
        match self {
            RelayError::Structural(_) | RelayError::Config(ConfigError::Missing(_)) => {
                json!({ "error": "Invalid event structure" })
            }
            _ => json!({ "error": "Oh no! Internal server error" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_body() {
        let err = RelayError::structural("missing detail.bucket.name");
        assert_eq!(err.code(), "STRUCTURAL_ERROR");
        assert_eq!(err.public_body(), json!({"error": "Invalid event structure"}));
    }

    #[test]
    fn test_missing_setting_reads_as_structural() {
        let err = RelayError::from(ConfigError::Missing("QUEUE_URL"));
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert_eq!(err.public_body(), json!({"error": "Invalid event structure"}));
        assert!(!err.public_body().to_string().contains("QUEUE_URL"));
    }

    #[test]
    fn test_other_errors_hide_cause() {
        let err = RelayError::from(StorageError::NotFound("tiki-bar/lobby/hero.json".to_string()));
        assert_eq!(err.code(), "FETCH_ERROR");
        assert_eq!(err.public_body(), json!({"error": "Oh no! Internal server error"}));

        let err = RelayError::Malformed("'events' is not an array".to_string());
        assert_eq!(err.code(), "DECODE_ERROR");
        assert_eq!(err.public_body(), json!({"error": "Oh no! Internal server error"}));
    }

    #[test]
    fn test_decode_from_serde() {
        let err: RelayError = serde_json::from_str::<Value>("{not json").unwrap_err().into();
        assert_eq!(err.code(), "DECODE_ERROR");
    }
}
