pub mod error;
pub mod traits;
pub mod types;

pub use error::{error_chain, RelayError};
pub use traits::CompletionClient;
pub use types::{
    CaptionOutcome, ChatMessage, CompletionPayload, ContentPart, ImageUrl, DEFAULT_SYSTEM_PROMPT,
};
