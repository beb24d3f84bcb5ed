//! Novita AI text-to-image client.

use super::NOVITA_IMAGE_URL;
use super::dto::{TextToImageRequest, TextToImageResponse};
use crate::http::{require_key, transport_error};
use async_trait::async_trait;
use tracing::{debug, error, instrument};
use ukiyo_core::{ImageRequest, ProviderId};
use ukiyo_error::{ProviderError, ProviderErrorKind, ProviderResult};
use ukiyo_interface::ImageBackend;

/// Client for Novita AI's synchronous text-to-image endpoint.
#[derive(Debug, Clone)]
pub struct NovitaImageClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl NovitaImageClient {
    /// Create a client against the public endpoint.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            url: NOVITA_IMAGE_URL.to_string(),
        }
    }

    /// Use a different endpoint URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl ImageBackend for NovitaImageClient {
    #[instrument(skip(self, request), fields(provider = "Novita AI", model = %model))]
    async fn render(&self, model: &str, request: &ImageRequest) -> ProviderResult<String> {
        require_key(&self.api_key, "Novita AI")?;
        let body = TextToImageRequest::new(model, request);

        debug!(
            width = body.width,
            height = body.height,
            steps = body.steps,
            "Sending text-to-image request"
        );

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
            return Err(ProviderError::new(
                crate::openai_compat::classify_failure(status.as_u16(), model, &error_text),
            ));
        }

        let parsed: TextToImageResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ProviderError::new(ProviderErrorKind::MalformedResponse(e.to_string()))
        })?;

        match parsed.first_image() {
            Some(image) => {
                debug!(bytes_b64 = image.len(), "Received image");
                Ok(image.to_string())
            }
            None => Err(ProviderError::new(ProviderErrorKind::EmptyResponse)),
        }
    }

    fn provider(&self) -> ProviderId {
        ProviderId::NovitaAi
    }
}
