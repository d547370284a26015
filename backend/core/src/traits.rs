use async_trait::async_trait;
use serde_json::Value;

use crate::error::RelayError;
use crate::types::CompletionPayload;

/// Trait for the upstream chat-completion service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name (e.g., "openrouter", "mock").
    fn name(&self) -> &str;

    /// Endpoint the client posts to.
    fn endpoint(&self) -> &str;

    /// Send one completion request and return the parsed JSON body.
    ///
    /// The HTTP status is not inspected: any JSON body is returned as-is so the
    /// caller can decide whether it carries a completion.
    async fn complete(&self, payload: &CompletionPayload) -> Result<Value, RelayError>;
}
