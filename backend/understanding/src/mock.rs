use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use captionforge_core::{CompletionClient, CompletionPayload, RelayError};

enum MockReply {
    Json(Value),
    Fail(String),
}

/// A completion client that returns a canned reply and records what it was sent.
pub struct MockCompletionClient {
    reply: MockReply,
    calls: AtomicUsize,
    last_payload: Mutex<Option<CompletionPayload>>,
}

impl MockCompletionClient {
    /// Reply to every call with `body`.
    pub fn with_json(body: Value) -> Self {
        Self::new(MockReply::Json(body))
    }

    /// Fail every call with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::Fail(message.into()))
    }

    fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<CompletionPayload> {
        self.last_payload
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        "mock"
    }

    fn endpoint(&self) -> &str {
        "mock://chat/completions"
    }

    async fn complete(&self, payload: &CompletionPayload) -> Result<Value, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_payload.lock() {
            *last = Some(payload.clone());
        }
        match &self.reply {
            MockReply::Json(body) => Ok(body.clone()),
            MockReply::Fail(message) => Err(RelayError::Upstream(message.clone())),
        }
    }
}
