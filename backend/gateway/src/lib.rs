//! captionforge HTTP gateway
//!
//! Exposes `POST /generate-caption/` and a health endpoint.

pub mod caption_api;
pub mod health_api;
pub mod server;

pub use caption_api::{CaptionForm, CaptionFormRejection, UploadedFile};
pub use server::{build_router, start_server, GatewayState};
