//! Caption endpoint (`POST /generate-caption/`).
//!
//! `CaptionForm` binds the multipart body before the handler runs, so a missing
//! `file` part is rejected at the extractor with 422 and the handler only ever
//! sees complete forms.

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        FromRequest, Multipart, Request, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use captionforge_core::{CaptionOutcome, DEFAULT_SYSTEM_PROMPT};
use captionforge_understanding::{generate_caption as run_pipeline, CaptionRequest};

use crate::server::GatewayState;

/// The uploaded image part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Bound multipart form of a caption request.
#[derive(Debug, Clone)]
pub struct CaptionForm {
    pub file: UploadedFile,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Why a request could not be bound to a `CaptionForm`.
#[derive(Debug)]
pub enum CaptionFormRejection {
    /// The body is not `multipart/form-data` at all.
    NotMultipart(MultipartRejection),
    /// The multipart stream broke off or exceeded the body limit.
    Malformed(MultipartError),
    /// No `file` part was sent.
    MissingFile,
    /// A `file` part was sent as a plain form value, without a filename.
    NotAFile,
}

impl IntoResponse for CaptionFormRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotMultipart(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Caption request is not multipart");
                missing_file_response()
            }
            Self::MissingFile => missing_file_response(),
            Self::NotAFile => binding_error_response("Expected UploadFile, received: str", "value_error"),
            Self::Malformed(err) => (err.status(), err.body_text()).into_response(),
        }
    }
}

fn missing_file_response() -> Response {
    binding_error_response("field required", "value_error.missing")
}

fn binding_error_response(msg: &str, kind: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{
                "loc": ["body", "file"],
                "msg": msg,
                "type": kind
            }]
        })),
    )
        .into_response()
}

#[async_trait]
impl<S> FromRequest<S> for CaptionForm
where
    S: Send + Sync,
{
    type Rejection = CaptionFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(CaptionFormRejection::NotMultipart)?;

        let mut file = None;
        let mut system_prompt = None;
        let mut user_prompt = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(CaptionFormRejection::Malformed)?
        {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "file" => {
                    let Some(file_name) = field.file_name().map(str::to_owned) else {
                        return Err(CaptionFormRejection::NotAFile);
                    };
                    let content_type = field.content_type().map(str::to_owned);
                    let bytes = field.bytes().await.map_err(CaptionFormRejection::Malformed)?;
                    file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                "system_prompt" => {
                    system_prompt = Some(field.text().await.map_err(CaptionFormRejection::Malformed)?);
                }
                "user_prompt" => {
                    user_prompt = Some(field.text().await.map_err(CaptionFormRejection::Malformed)?);
                }
                // Unknown parts are skipped.
                _ => {}
            }
        }

        // An empty prompt field counts as not sent.
        Ok(CaptionForm {
            file: file.ok_or(CaptionFormRejection::MissingFile)?,
            system_prompt: system_prompt
                .filter(|s: &String| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            user_prompt: user_prompt.unwrap_or_default(),
        })
    }
}

/// Handler for `POST /generate-caption/`.
///
/// Always answers 200; failures are reported in the `error` field.
pub async fn generate_caption(
    State(state): State<GatewayState>,
    form: CaptionForm,
) -> Json<CaptionOutcome> {
    let span = info_span!(
        "caption",
        request_id = %Uuid::new_v4(),
        file_name = form.file.file_name.as_str(),
    );

    let request = CaptionRequest {
        image: &form.file.bytes,
        content_type: form.file.content_type.as_deref(),
        system_prompt: &form.system_prompt,
        user_prompt: &form.user_prompt,
    };

    let outcome = run_pipeline(state.client.as_ref(), request)
        .instrument(span)
        .await;
    Json(outcome)
}
