//! Entrypoints: the Lambda runtime loop and one-shot local invocation

use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;
use std::env;
use tokio::io::AsyncReadExt;
use tracing::{Instrument, info, info_span, warn};

use crate::handlers::{EventHandler, HandlerRegistry, InvocationResult, RegistryError};

pub type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Variable the platform sets to the function's configured handler
pub const PLATFORM_HANDLER_ENV: &str = "_HANDLER";

/// Explicit name wins, otherwise the platform's `_HANDLER`
pub fn resolve_handler_name(explicit: Option<String>) -> Result<String, RegistryError> {
    explicit
        .or_else(|| env::var(PLATFORM_HANDLER_ENV).ok())
        .filter(|name| !name.trim().is_empty())
        .ok_or(RegistryError::Unspecified)
}

/// Poll the runtime API and feed every event to the named handler
pub async fn serve(registry: &HandlerRegistry, name: &str) -> Result<(), AnyError> {
    let handler = registry.get(name)?;
    info!(handler = name, "Starting runtime loop");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move { dispatch(handler.as_ref(), event).await }
    }))
    .await
}

/// Run one runtime event through a handler inside a per-request span
pub async fn dispatch(
    handler: &dyn EventHandler,
    event: LambdaEvent<Value>,
) -> Result<InvocationResult, AnyError> {
    let (payload, context) = event.into_parts();
    let span = info_span!(
        "invocation",
        handler = handler.name(),
        request_id = %context.request_id
    );

    let result = handler.handle(payload).instrument(span.clone()).await;
    span.in_scope(|| log_outcome(&result));

    Ok(result)
}

fn log_outcome(result: &InvocationResult) {
    if result.is_success() {
        info!(status = result.status_code, "Invocation succeeded");
    } else {
        warn!(status = result.status_code, "Invocation failed");
    }
}

/// Read an event document from a file, or stdin when `source` is `-`
pub async fn read_event(source: &str) -> Result<Value, AnyError> {
    let raw = if source == "-" {
        let mut raw = String::new();
        tokio::io::stdin().read_to_string(&mut raw).await?;
        raw
    } else {
        tokio::fs::read_to_string(source).await?
    };

    Ok(serde_json::from_str(&raw)?)
}

/// Run the named handler once outside the runtime loop
pub async fn invoke(
    registry: &HandlerRegistry,
    name: &str,
    event: Value,
) -> Result<InvocationResult, RegistryError> {
    let handler = registry.get(name)?;
    let span = info_span!("invocation", handler = name, request_id = "local");

    let result = handler.handle(event).instrument(span.clone()).await;
    span.in_scope(|| log_outcome(&result));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StorageProvider};
    use crate::handlers::Collaborators;
    use crate::messaging::MemoryProducer;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn registry() -> HandlerRegistry {
        let mut config = Config::default();
        config.storage.provider = StorageProvider::Memory;

        let collaborators =
            Collaborators::with_producer(&config, Arc::new(MemoryProducer::new())).unwrap();
        HandlerRegistry::with_collaborators(&config, collaborators)
    }

    #[test]
    fn test_explicit_handler_name_wins() {
        let name = resolve_handler_name(Some("tower".to_string())).unwrap();
        assert_eq!(name, "tower");
    }

    #[tokio::test]
    async fn test_read_event_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("event.json");
        std::fs::write(&path, r#"{"Records":[{"body":"{\"a\":1}"}]}"#).unwrap();

        let event = read_event(path.to_str().unwrap()).await.unwrap();
        assert_eq!(event["Records"][0]["body"], json!("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_read_event_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("event.json");
        std::fs::write(&path, "{").unwrap();

        assert!(read_event(path.to_str().unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn test_invoke_unknown_handler() {
        let result = invoke(&registry(), "lighthouse", json!({})).await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invoke_runs_handler() {
        let result = invoke(&registry(), "tower", json!({"Records": []}))
            .await
            .unwrap();
        assert_eq!(result.status_code, 200);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_dispatch_wraps_result() {
        let registry = registry();
        let handler = registry.get("village").unwrap();
        let event = LambdaEvent::new(json!({"detail": {}}), lambda_runtime::Context::default());

        let result = dispatch(handler.as_ref(), event).await.unwrap();
        assert_eq!(result.status_code, 400);
        assert!(!result.is_success());
        assert_eq!(result.body, r#"{"error":"Invalid event structure"}"#);
    }
}
