use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use captionforge_core::{error_chain, CompletionClient, CompletionPayload, RelayError};

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl OpenRouterClient {
    /// Build a client with a per-request timeout.
    ///
    /// A missing key is not an error here: the upstream rejects the call and
    /// its response is reported back to the caller.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Config(error_chain(&e)))?;
        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn complete(&self, payload: &CompletionPayload) -> Result<Value, RelayError> {
        debug!(model = %payload.model, endpoint = %self.endpoint, "Sending request to OpenRouter");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| RelayError::Upstream(error_chain(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Upstream(error_chain(&e)))?;

        debug!(%status, bytes = text.len(), "OpenRouter responded");

        serde_json::from_str(&text)
            .map_err(|e| RelayError::Decode(format!("HTTP {status}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::build_payload;
    use crate::MediaType;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn payload() -> CompletionPayload {
        build_payload(MediaType::Jpeg, b"\xff\xd8", "Describe this image", "sunset")
    }

    fn client_for(server: &MockServer, timeout: Duration) -> OpenRouterClient {
        OpenRouterClient::new(
            format!("{}/api/v1/chat/completions", server.uri()),
            Some("sk-or-test".into()),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_payload_with_bearer_key() {
        let server = MockServer::start().await;
        let body = json!({"choices": [{"message": {"content": "A sunset."}}]});
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-or-test"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "model": "openai/gpt-4o-mini",
                "max_tokens": 100
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        assert_eq!(client.complete(&payload()).await.unwrap(), body);
    }

    #[tokio::test]
    async fn error_status_body_is_still_returned() {
        let server = MockServer::start().await;
        let body = json!({"error": {"message": "No auth credentials found", "code": 401}});
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        assert_eq!(client.complete(&payload()).await.unwrap(), body);
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.complete(&payload()).await.unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(200));
        let err = client.complete(&payload()).await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let client = OpenRouterClient::new(
            "http://127.0.0.1:1/api/v1/chat/completions",
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.complete(&payload()).await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
        assert!(err.to_string().starts_with("upstream request failed:"));
    }
}
