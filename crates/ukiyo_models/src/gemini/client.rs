//! Gemini REST client.

use super::dto::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::http::{require_key, transport_error};
use async_trait::async_trait;
use tracing::{debug, error, instrument};
use ukiyo_core::{CompletionRequest, ProviderId};
use ukiyo_error::{ProviderError, ProviderErrorKind, ProviderResult};
use ukiyo_interface::TextBackend;

/// Default REST base for the Gemini API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for Gemini's `generateContent` endpoint.
///
/// Only the request temperature is forwarded; token caps and penalties are
/// left to the model defaults.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at another base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl TextBackend for GeminiClient {
    #[instrument(skip(self, request), fields(provider = "Gemini", model = %model))]
    async fn complete(&self, model: &str, request: &CompletionRequest) -> ProviderResult<String> {
        require_key(&self.api_key, "Gemini")?;

        let body = GenerateContentRequest {
            system_instruction: Content::text(None, request.system_prompt()),
            contents: vec![Content::text(Some("user"), request.user_prompt())],
            generation_config: GenerationConfig {
                temperature: *request.temperature(),
            },
        };

        debug!(
            system_chars = request.system_prompt().len(),
            user_chars = request.user_prompt().len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(ProviderError::new(classify_failure(
                status.as_u16(),
                model,
                &error_text,
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ProviderError::new(ProviderErrorKind::MalformedResponse(e.to_string()))
        })?;

        let text = parsed
            .text()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))?;

        debug!(chars = text.len(), "Received completion");
        Ok(text)
    }

    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }
}

/// Turn a non-success status and its body into a classified failure.
///
/// Gemini reports an invalid key as `400 INVALID_ARGUMENT` with an
/// `API_KEY_INVALID` reason in the error details, so the body is consulted
/// before falling back to the status code.
pub(crate) fn classify_failure(status: u16, model: &str, body: &str) -> ProviderErrorKind {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let key_rejected = envelope.as_ref().is_some_and(|e| {
        e.error
            .details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
            || e.error.status.as_deref() == Some("UNAUTHENTICATED")
    });

    match status {
        401 | 403 => ProviderErrorKind::Unauthorized { status, message },
        _ if key_rejected => ProviderErrorKind::Unauthorized { status, message },
        404 => ProviderErrorKind::ModelNotFound(model.to_string()),
        _ => ProviderErrorKind::Api { status, message },
    }
}
