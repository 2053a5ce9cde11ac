use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::traits::EventHandler;
use super::types::{InvocationResult, QueueEvent, record_body};
use crate::config::TowerConfig;
use crate::delivery::HttpForwarder;
use crate::error::RelayError;
use crate::observability::Metrics;

const SUCCESS_BODY: &str = "Message processed successfully";
const BATCH_FAILED_BODY: &str = "Error processing messages";
const INTERNAL_ERROR_BODY: &str = "Oh no! Internal server error";

/// Relay-to-endpoint handler
///
/// Forwards every queued record to the configured HTTP endpoint, strictly in
/// order and one at a time. A failed delivery is logged and counted but does
/// not stop the rest of the batch; the caller only sees pass/fail overall.
/// A record without a body is a broken batch: processing stops there and the
/// caller gets the internal-error answer, with earlier records already sent.
pub struct TowerHandler {
    forwarder: HttpForwarder,
    config: TowerConfig,
    metrics: Arc<Metrics>,
}

impl TowerHandler {
    pub const NAME: &'static str = "tower";

    pub fn new(forwarder: HttpForwarder, config: TowerConfig) -> Self {
        Self {
            forwarder,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    async fn forward_record(&self, body: &str) -> Result<StatusCode, RelayError> {
        let document: Value = serde_json::from_str(body)?;
        let url = self.config.require_api_gateway_url()?;

        Ok(self.forwarder.post_json(url, &document).await?)
    }
}

#[async_trait]
impl EventHandler for TowerHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: Value) -> InvocationResult {
        self.metrics.invocation();

        let batch = match QueueEvent::from_event(&event) {
            Ok(batch) => batch,
            Err(e) => {
                error!(code = e.code(), error = %e, "Unexpected error has occurred");
                return InvocationResult::internal_error(&json!(INTERNAL_ERROR_BODY));
            }
        };

        let mut results = Vec::with_capacity(batch.records.len());
        for (index, record) in batch.records.iter().enumerate() {
            let body = match record_body(record) {
                Ok(body) => body,
                Err(e) => {
                    error!(index, code = e.code(), error = %e, "Unexpected error has occurred");
                    self.metrics.record_failed();
                    return InvocationResult::internal_error(&json!(INTERNAL_ERROR_BODY));
                }
            };

            match self.forward_record(body).await {
                Ok(status) => {
                    info!(index, status = status.as_u16(), "Message processed successfully");
                    self.metrics.record_delivered();
                    results.push(true);
                }
                Err(e) => {
                    error!(index, code = e.code(), error = %e, "Failed to process message");
                    self.metrics.record_failed();
                    results.push(false);
                }
            }
        }

        debug!(metrics = ?self.metrics.snapshot(), "Batch finished");

        if results.iter().all(|delivered| *delivered) {
            InvocationResult::ok(&json!(SUCCESS_BODY))
        } else {
            InvocationResult::internal_error(&json!(BATCH_FAILED_BODY))
        }
    }
}
