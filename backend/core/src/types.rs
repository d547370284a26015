//! Wire types shared by the pipeline, the upstream client, and the gateway.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// System prompt used when the caller does not send one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Describe this image in a short caption.";

// ---------------------------------------------------------------------------
// Outbound chat-completion payload
// ---------------------------------------------------------------------------

/// Body POSTed to the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System { content: String },
    User { content: Vec<ContentPart> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl CompletionPayload {
    /// The data URI carried by the user message, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.messages.iter().find_map(|m| match m {
            ChatMessage::User { content } => content.iter().find_map(|part| match part {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            }),
            ChatMessage::System { .. } => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Result returned to the HTTP caller
// ---------------------------------------------------------------------------

/// Outcome of one caption request.
///
/// Serializes to `{"caption": ...}` or `{"error": ...}`; the error is either a
/// message or the upstream body passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CaptionOutcome {
    Caption { caption: String },
    Error { error: String },
    Passthrough { error: Value },
}

impl CaptionOutcome {
    pub fn caption(caption: impl Into<String>) -> Self {
        Self::Caption { caption: caption.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { error: message.into() }
    }

    pub fn passthrough(body: Value) -> Self {
        Self::Passthrough { error: body }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Caption { .. } => "caption",
            Self::Error { .. } => "error",
            Self::Passthrough { .. } => "passthrough",
        }
    }
}
