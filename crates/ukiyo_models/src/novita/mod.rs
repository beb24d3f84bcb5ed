//! Novita AI endpoints.
//!
//! Text goes through the OpenAI-compatible chat endpoint; images through the
//! synchronous `v3/text-to-image` endpoint.

mod dto;
mod image;

pub use image::NovitaImageClient;

use crate::OpenAICompatibleClient;
use ukiyo_core::ProviderId;

/// Novita AI chat completions endpoint.
pub const NOVITA_CHAT_URL: &str = "https://api.novita.ai/openai/v1/chat/completions";

/// Novita AI text-to-image endpoint.
pub const NOVITA_IMAGE_URL: &str = "https://api.novita.ai/v3/text-to-image";

/// Chat client pointed at Novita AI.
pub fn novita_chat_client(
    client: reqwest::Client,
    api_key: impl Into<String>,
) -> OpenAICompatibleClient {
    OpenAICompatibleClient::new(client, api_key, NOVITA_CHAT_URL, ProviderId::NovitaAi)
}
