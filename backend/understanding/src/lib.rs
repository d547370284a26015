//! Image understanding for the caption relay.

pub mod media_type;
pub mod mock;
pub mod openrouter;
pub mod vision;

pub use media_type::{check_media_type, resolve_media_type, MediaType, FALLBACK_MEDIA_TYPE};
pub use mock::MockCompletionClient;
pub use openrouter::OpenRouterClient;
pub use vision::{
    build_payload, data_uri, extract_caption, generate_caption, CaptionRequest, CAPTION_MAX_TOKENS,
    CAPTION_MODEL,
};
