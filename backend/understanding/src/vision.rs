//! Vision captioning: turn an uploaded image into a caption via a multimodal
//! chat-completion API.

use std::time::Instant;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use tracing::{info, warn};

use captionforge_core::{
    CaptionOutcome, ChatMessage, CompletionClient, CompletionPayload, ContentPart, ImageUrl,
    RelayError,
};
use captionforge_logging::redact_sensitive_data;

use crate::media_type::{check_media_type, MediaType};

/// Model every caption request is sent to.
pub const CAPTION_MODEL: &str = "openai/gpt-4o-mini";

/// Response length cap for a caption.
pub const CAPTION_MAX_TOKENS: u32 = 100;

/// One caption request, borrowed from the inbound HTTP form.
#[derive(Debug, Clone, Copy)]
pub struct CaptionRequest<'a> {
    pub image: &'a [u8],
    pub content_type: Option<&'a str>,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
}

/// `data:<media type>;base64,<payload>` for raw image bytes.
pub fn data_uri(media_type: MediaType, image: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(image))
}

/// Assemble the system + user message payload for a validated request.
pub fn build_payload(
    media_type: MediaType,
    image: &[u8],
    system_prompt: &str,
    user_prompt: &str,
) -> CompletionPayload {
    CompletionPayload {
        model: CAPTION_MODEL.to_string(),
        messages: vec![
            ChatMessage::System {
                content: system_prompt.to_string(),
            },
            ChatMessage::User {
                content: vec![
                    ContentPart::Text {
                        text: user_prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: data_uri(media_type, image),
                        },
                    },
                ],
            },
        ],
        max_tokens: CAPTION_MAX_TOKENS,
    }
}

/// Pull the caption out of an upstream body.
///
/// A body without `choices` is an upstream-reported failure (auth, quota, ...)
/// and is handed back untouched.
pub fn extract_caption(body: Value) -> CaptionOutcome {
    if body.get("choices").is_none() {
        return CaptionOutcome::passthrough(body);
    }
    let content = body["choices"]
        .get(0)
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str);
    match content {
        Some(caption) => CaptionOutcome::caption(caption),
        None => CaptionOutcome::error(RelayError::MalformedCompletion.to_string()),
    }
}

/// Run the full pipeline: validate, encode, call upstream, unwrap.
///
/// Never fails: every error becomes a `CaptionOutcome` carrying an `error`.
pub async fn generate_caption(
    client: &dyn CompletionClient,
    request: CaptionRequest<'_>,
) -> CaptionOutcome {
    let media_type = match check_media_type(request.content_type) {
        Ok(media_type) => media_type,
        Err(e) => {
            info!(error = %e, "Rejected upload before calling upstream");
            return CaptionOutcome::error(e.to_string());
        }
    };

    info!(
        media_type = %media_type,
        bytes = request.image.len(),
        client = client.name(),
        "Requesting caption"
    );

    let payload = build_payload(
        media_type,
        request.image,
        request.system_prompt,
        request.user_prompt,
    );

    let start = Instant::now();
    let result = client.complete(&payload).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let outcome = match result {
        Ok(body) => extract_caption(body),
        Err(e) => {
            warn!(latency_ms, error = %redact_sensitive_data(&e.to_string()), "Upstream call failed");
            return CaptionOutcome::error(e.to_string());
        }
    };

    match &outcome {
        CaptionOutcome::Passthrough { error } => warn!(
            latency_ms,
            body = %redact_sensitive_data(&error.to_string()),
            "Upstream response has no choices"
        ),
        other => info!(latency_ms, outcome = other.kind(), "Caption request finished"),
    }
    outcome
}
