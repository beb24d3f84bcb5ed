//! Generic client for OpenAI-compatible APIs.

use super::dto::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse};
use crate::http::{require_key, transport_error};
use async_trait::async_trait;
use tracing::{debug, error, instrument};
use ukiyo_core::{CompletionRequest, ProviderId};
use ukiyo_error::{ProviderError, ProviderErrorKind, ProviderResult};
use ukiyo_interface::TextBackend;

/// Client for any OpenAI-compatible chat completions endpoint.
///
/// One client serves every model the endpoint offers; the model name is
/// chosen per call.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    provider: ProviderId,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client (carries the request timeout)
    /// * `api_key` - Bearer token
    /// * `base_url` - Full URL of the chat completions endpoint
    /// * `provider` - Provider identity reported with each completion
    #[instrument(skip_all, fields(provider = %provider))]
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        provider: ProviderId,
    ) -> Self {
        let base_url = base_url.into();
        debug!(url = %base_url, "Created OpenAI-compatible client");
        Self {
            client,
            api_key: api_key.into(),
            base_url,
            provider,
        }
    }

    fn chat_request(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> ProviderResult<ChatRequest> {
        ChatRequest::builder()
            .model(model)
            .messages(vec![
                ChatMessage::new("system", request.system_prompt().as_str()),
                ChatMessage::new("user", request.user_prompt().as_str()),
            ])
            .max_tokens(*request.max_tokens())
            .temperature(*request.temperature())
            .presence_penalty(*request.presence_penalty())
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                    "Could not build chat request: {e}"
                )))
            })
    }
}

#[async_trait]
impl TextBackend for OpenAICompatibleClient {
    #[instrument(skip(self, request), fields(provider = %self.provider, model = %model))]
    async fn complete(&self, model: &str, request: &CompletionRequest) -> ProviderResult<String> {
        require_key(&self.api_key, self.provider.as_ref())?;
        let chat_request = self.chat_request(model, request)?;

        debug!(
            message_count = chat_request.messages().len(),
            "Sending request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
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

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                "Failed to parse JSON: {e}"
            )))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");

        chat_response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::MalformedResponse(
                    "response has no choices[0].message.content".to_string(),
                ))
            })
    }

    fn provider(&self) -> ProviderId {
        self.provider
    }
}

/// Classify a non-success chat response.
///
/// A 404 only means "unknown model" when the body says `MODEL_NOT_FOUND`;
/// other 404s are ordinary API failures.
pub(crate) fn classify_failure(status: u16, model: &str, body: &str) -> ProviderErrorKind {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed.message.clone().unwrap_or_else(|| body.to_string());

    match status {
        401 => ProviderErrorKind::Unauthorized { status, message },
        404 if parsed.reason.as_deref() == Some("MODEL_NOT_FOUND") => {
            ProviderErrorKind::ModelNotFound(model.to_string())
        }
        _ => ProviderErrorKind::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_without_reason_is_an_api_error() {
        let kind = classify_failure(404, "m", r#"{"message":"no route"}"#);
        assert_eq!(
            kind,
            ProviderErrorKind::Api {
                status: 404,
                message: "no route".into()
            }
        );
    }

    #[test]
    fn model_not_found_reason_is_recognized() {
        let kind = classify_failure(
            404,
            "deepseek/deepseek-r1",
            r#"{"code":404,"reason":"MODEL_NOT_FOUND","message":"model not found"}"#,
        );
        assert_eq!(kind, ProviderErrorKind::ModelNotFound("deepseek/deepseek-r1".into()));
    }
}
