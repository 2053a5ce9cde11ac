use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::traits::EventHandler;
use super::types::{Clock, Document, InvocationResult, LocalClock, StorageEvent, stamp_document};
use crate::config::VillageConfig;
use crate::error::RelayError;
use crate::messaging::{MessageProducer, MessageReceipt};
use crate::observability::Metrics;
use crate::storage::StorageClient;

/// Relay-to-queue handler
///
/// Triggered by an object-created notification: downloads the object, stamps
/// it with tracking entries and publishes it to the configured queue. The
/// success body echoes the triggering event, not the stamped document.
pub struct VillageHandler {
    storage: StorageClient,
    producer: Arc<dyn MessageProducer>,
    config: VillageConfig,
    clock: Arc<dyn Clock>,
    metrics: Arc<Metrics>,
}

impl VillageHandler {
    pub const NAME: &'static str = "village";

    pub fn new(
        storage: StorageClient,
        producer: Arc<dyn MessageProducer>,
        config: VillageConfig,
    ) -> Self {
        Self {
            storage,
            producer,
            config,
            clock: Arc::new(LocalClock),
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    async fn relay(&self, event: &Value) -> Result<MessageReceipt, RelayError> {
        let location = StorageEvent::from_event(event)?;
        let (bucket, key) = (location.bucket(), location.key());

        let content = self.storage.download(bucket, key).await?;
        let mut document: Document = serde_json::from_slice(&content)?;

        stamp_document(&mut document, self.clock.today())?;

        let queue_url = self.config.require_queue_url()?;
        let body = serde_json::to_string(&document)?;
        let receipt = self.producer.publish(queue_url, body).await?;
        self.metrics.message_published();

        info!(bucket, key, message_id = %receipt.message_id, "Message sent to queue");

        Ok(receipt)
    }
}

#[async_trait]
impl EventHandler for VillageHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: Value) -> InvocationResult {
        self.metrics.invocation();

        let outcome = self.relay(&event).await;
        debug!(metrics = ?self.metrics.snapshot(), "Event finished");

        match outcome {
            Ok(_) => InvocationResult::ok(&event),
            Err(e) => {
                error!(code = e.code(), error = %e, "Error processing event");
                InvocationResult::bad_request(&e.public_body())
            }
        }
    }
}
