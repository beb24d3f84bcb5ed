//! Wire types for `v3/text-to-image`.

use serde::{Deserialize, Serialize};
use ukiyo_core::ImageRequest;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TextToImageRequest<'a> {
    pub model_name: &'a str,
    pub prompt: &'a str,
    pub negative_prompt: &'a str,
    pub width: u32,
    pub height: u32,
    pub sampler_name: &'a str,
    pub steps: u32,
    pub cfg_scale: f32,
    pub sd_vae: &'static str,
}

impl<'a> TextToImageRequest<'a> {
    pub fn new(model_name: &'a str, request: &'a ImageRequest) -> Self {
        Self {
            model_name,
            prompt: request.prompt(),
            negative_prompt: request.negative_prompt(),
            width: *request.width(),
            height: *request.height(),
            sampler_name: request.sampler_name(),
            steps: *request.steps(),
            cfg_scale: *request.cfg_scale(),
            sd_vae: "auto",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TextToImageResponse {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

impl TextToImageResponse {
    pub fn first_image(&self) -> Option<&str> {
        self.images
            .first()?
            .image_b64
            .as_deref()
            .filter(|b| !b.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedImage {
    #[serde(default)]
    pub image_b64: Option<String>,
}
