//! HTTP client for forwarding documents to the configured endpoint

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::HttpSettings;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Endpoint rejected message: HTTP {status}: {reason}")]
    Rejected { status: u16, reason: String },
}

pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Posts JSON documents; one attempt per call, retries belong to the platform
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    /// Create a new forwarder
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| DeliveryError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// POST `document` as JSON, returning the 2xx status the endpoint answered with
    pub async fn post_json(&self, url: &str, document: &Value) -> Result<StatusCode> {
        let url = Url::parse(url).map_err(|e| DeliveryError::InvalidUrl(format!("{url}: {e}")))?;

        debug!(%url, "Posting document");

        let response = self
            .client
            .post(url.clone())
            .json(document)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        debug!(%url, status = status.as_u16(), "Document delivered");

        Ok(status)
    }
}
