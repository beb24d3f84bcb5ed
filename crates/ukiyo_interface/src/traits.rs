//! Provider and gateway traits.

use async_trait::async_trait;
use ukiyo_core::{Completion, CompletionRequest, ImageRequest, ProviderId};
use ukiyo_error::{ProviderResult, UkiyoResult};

/// One text provider API, callable with any of its model names.
///
/// Implementations perform exactly one HTTP exchange per call and report
/// failures as [`ukiyo_error::ProviderError`] so callers can classify them.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Request a completion from `model`. Returns non-empty text.
    async fn complete(&self, model: &str, request: &CompletionRequest) -> ProviderResult<String>;

    /// Which provider this backend talks to.
    fn provider(&self) -> ProviderId;
}

/// One image provider API, callable with any of its model names.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Render an image with `model`. Returns the base64 PNG body.
    async fn render(&self, model: &str, request: &ImageRequest) -> ProviderResult<String>;

    /// Which provider this backend talks to.
    fn provider(&self) -> ProviderId;
}

/// Text completion with provider fallback already applied.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    /// Complete a system + user prompt pair.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> UkiyoResult<Completion>;
}

/// Panel rendering with model fallback already applied.
#[async_trait]
pub trait ImageCompleter: Send + Sync {
    /// Render a scene description, returning a `data:image/png;base64,` URI.
    async fn complete_image(&self, scene_description: &str) -> UkiyoResult<String>;
}
