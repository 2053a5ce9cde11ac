use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::tower::TowerHandler;
use super::traits::EventHandler;
use super::types::{Clock, LocalClock};
use super::village::VillageHandler;
use crate::config::Config;
use crate::delivery::{DeliveryError, HttpForwarder};
use crate::messaging::{MessageProducer, SqsProducer};
use crate::observability::Metrics;
use crate::storage::StorageClient;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("handler not found: {0}")]
    NotFound(String),

    #[error("no handler selected")]
    Unspecified,

    #[error("failed to build HTTP forwarder: {0}")]
    Forwarder(#[from] DeliveryError),
}

/// Outbound clients shared by every handler in the process
#[derive(Clone)]
pub struct Collaborators {
    pub storage: StorageClient,
    pub producer: Arc<dyn MessageProducer>,
    pub forwarder: HttpForwarder,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}

impl Collaborators {
    /// Production clients: object storage per config, SQS from the AWS environment
    pub async fn connect(config: &Config) -> Result<Self, RegistryError> {
        let producer = SqsProducer::from_env().await;
        Self::with_producer(config, Arc::new(producer))
    }

    /// Same as [`connect`](Self::connect) with a caller-supplied producer
    pub fn with_producer(
        config: &Config,
        producer: Arc<dyn MessageProducer>,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            storage: StorageClient::from_config(&config.storage),
            producer,
            forwarder: HttpForwarder::new(&config.tower.http)?,
            clock: Arc::new(LocalClock),
            metrics: Arc::new(Metrics::new()),
        })
    }
}

/// Registry mapping handler names to handler instances
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn EventHandler>, RegistryError> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// Registry with both relays wired to the given collaborators
    pub fn with_collaborators(config: &Config, collaborators: Collaborators) -> Self {
        let village = VillageHandler::new(
            collaborators.storage,
            collaborators.producer,
            config.village.clone(),
        )
        .with_clock(collaborators.clock)
        .with_metrics(collaborators.metrics.clone());

        let tower = TowerHandler::new(collaborators.forwarder, config.tower.clone())
            .with_metrics(collaborators.metrics);

        let mut registry = Self::new();
        registry.register(Arc::new(village));
        registry.register(Arc::new(tower));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageProvider;
    use crate::messaging::MemoryProducer;

    fn registry() -> HandlerRegistry {
        let mut config = Config::default();
        config.storage.provider = StorageProvider::Memory;

        let collaborators =
            Collaborators::with_producer(&config, Arc::new(MemoryProducer::new())).unwrap();
        HandlerRegistry::with_collaborators(&config, collaborators)
    }

    #[test]
    fn test_both_relays_registered() {
        let registry = registry();

        assert_eq!(registry.names(), vec!["tower", "village"]);
        assert!(registry.has_handler("village"));
        assert_eq!(registry.get("tower").unwrap().name(), "tower");
    }

    #[test]
    fn test_unknown_handler() {
        let result = registry().get("lighthouse");

        assert!(matches!(result, Err(RegistryError::NotFound(ref name)) if name == "lighthouse"));
    }
}
