//! Queue publishing abstraction
//!
//! `SqsProducer` talks to the real queue; `MemoryProducer` keeps published
//! messages in process for tests and dry runs.

mod sqs;

pub use sqs::SqsProducer;

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Invalid destination: {0}")]
    InvalidDestination(String),
}

pub type Result<T> = std::result::Result<T, MessagingError>;

/// Acknowledgement returned by the queue for one published message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceipt {
    pub message_id: String,
}

/// Message producer for publishing documents to a queue
#[async_trait]
pub trait MessageProducer: Send + Sync {
    /// Publish one message body to the destination queue
    async fn publish(&self, destination: &str, body: String) -> Result<MessageReceipt>;
}

/// A message captured by [`MemoryProducer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub destination: String,
    pub message_id: String,
    pub body: String,
}

/// In-process producer that records every publish
#[derive(Debug, Default)]
pub struct MemoryProducer {
    messages: Mutex<Vec<PublishedMessage>>,
}

impl MemoryProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published so far, oldest first
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MessageProducer for MemoryProducer {
    async fn publish(&self, destination: &str, body: String) -> Result<MessageReceipt> {
        if destination.is_empty() {
            return Err(MessagingError::InvalidDestination(
                "destination is empty".to_string(),
            ));
        }

        let message_id = Uuid::new_v4().to_string();
        tracing::info!(destination, size = body.len(), message_id = %message_id, "In-memory publish");

        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PublishedMessage {
                destination: destination.to_string(),
                message_id: message_id.clone(),
                body,
            });

        Ok(MessageReceipt { message_id })
    }
}
