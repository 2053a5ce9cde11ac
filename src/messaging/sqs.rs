use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;

use super::{MessageProducer, MessageReceipt, MessagingError, Result};

/// Producer backed by Amazon SQS `SendMessage`
#[derive(Debug, Clone)]
pub struct SqsProducer {
    client: Client,
}

impl SqsProducer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS environment (region, credentials)
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl MessageProducer for SqsProducer {
    async fn publish(&self, destination: &str, body: String) -> Result<MessageReceipt> {
        let size = body.len();

        let output = self
            .client
            .send_message()
            .queue_url(destination)
            .message_body(body)
            .send()
            .await
            .map_err(|e| MessagingError::PublishFailed(DisplayErrorContext(&e).to_string()))?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        tracing::debug!(destination, size, message_id = %message_id, "Published to SQS");

        Ok(MessageReceipt { message_id })
    }
}
