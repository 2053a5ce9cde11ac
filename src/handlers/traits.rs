use async_trait::async_trait;
use serde_json::Value;

use super::types::InvocationResult;

/// An event-triggered function the platform invokes once per event.
///
/// Implementations never fail: every error is logged and folded into the
/// returned [`InvocationResult`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name the handler is registered and selected under
    fn name(&self) -> &'static str;

    /// Handle one platform event
    async fn handle(&self, event: Value) -> InvocationResult;
}
