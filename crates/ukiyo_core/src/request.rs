//! Completion request and response types.

use crate::ProviderId;
use serde::{Deserialize, Serialize};

/// A two-message text completion: system instructions plus one user turn.
///
/// Sampling parameters are optional; each backend sends only those its API
/// understands.
///
/// # Examples
///
/// ```
/// use ukiyo_core::CompletionRequest;
///
/// let request = CompletionRequest::builder()
///     .system_prompt("You write manga scripts.")
///     .user_prompt("Write the plot.")
///     .temperature(0.9_f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.temperature(), Some(0.9));
/// assert_eq!(*request.max_tokens(), None);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// System instructions
    system_prompt: String,
    /// The user turn
    user_prompt: String,
    /// Sampling temperature
    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,
    /// Upper bound on generated tokens
    #[builder(default, setter(strip_option))]
    max_tokens: Option<u32>,
    /// Presence penalty (OpenAI-compatible backends)
    #[builder(default, setter(strip_option))]
    presence_penalty: Option<f32>,
}

impl CompletionRequest {
    /// Start building a request.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }
}

/// Text returned by a gateway, tagged with who produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text, never empty
    pub text: String,
    /// Provider that answered
    pub provider: ProviderId,
    /// Model that answered
    pub model: String,
}

/// Text-to-image request parameters.
///
/// Defaults match the manga panel format: portrait 684x1024, 30 steps of
/// "DPM++ 2M Karras" at CFG 7.
///
/// # Examples
///
/// ```
/// use ukiyo_core::ImageRequest;
///
/// let request = ImageRequest::builder()
///     .prompt("a quiet street at dusk")
///     .negative_prompt("text, watermark")
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.width(), 684);
/// assert_eq!(request.sampler_name(), "DPM++ 2M Karras");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Positive prompt
    prompt: String,
    /// Negative prompt
    negative_prompt: String,
    /// Output width in pixels
    #[builder(default = "684")]
    width: u32,
    /// Output height in pixels
    #[builder(default = "1024")]
    height: u32,
    /// Sampler name
    #[builder(default = "\"DPM++ 2M Karras\".to_string()")]
    sampler_name: String,
    /// Diffusion steps
    #[builder(default = "30")]
    steps: u32,
    /// Classifier-free guidance scale
    #[builder(default = "7.0")]
    cfg_scale: f32,
}

impl ImageRequest {
    /// Start building a request.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}
