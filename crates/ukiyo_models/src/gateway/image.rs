//! Panel rendering over an ordered list of image models.

use super::{CandidateChain, FailurePolicy, PANEL_NEGATIVE_PROMPT, panel_prompt};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use ukiyo_core::{Illustration, ImageRequest};
use ukiyo_error::{ConfigError, UkiyoResult};
use ukiyo_interface::{ImageBackend, ImageCompleter};

/// Renders a scene with the first image model that answers.
///
/// Rejected credentials end the loop at once; any other failure, including a
/// success response without an image, moves on to the next model.
#[derive(Clone)]
pub struct ImageGateway {
    backend: Arc<dyn ImageBackend>,
    models: Vec<String>,
    policy: FailurePolicy,
}

impl std::fmt::Debug for ImageGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGateway")
            .field("provider", &self.backend.provider())
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl ImageGateway {
    /// Gateway over `models`, in order.
    pub fn new(backend: Arc<dyn ImageBackend>, models: Vec<String>) -> Self {
        Self {
            backend,
            models,
            policy: FailurePolicy::default(),
        }
    }

    /// Replace the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl ImageCompleter for ImageGateway {
    #[instrument(skip_all, fields(provider = %self.backend.provider(), models = self.models.len()))]
    async fn complete_image(&self, scene_description: &str) -> UkiyoResult<String> {
        let request = ImageRequest::builder()
            .prompt(panel_prompt(scene_description))
            .negative_prompt(PANEL_NEGATIVE_PROMPT)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid image request: {e}")))?;

        let backend = &self.backend;
        let request = &request;
        let (image_b64, model) = CandidateChain::new(backend.provider(), &self.models, self.policy)
            .run(|model| async move { backend.render(&model, request).await })
            .await?;

        debug!(model = %model, "Panel rendered");
        Ok(Illustration::png_data_uri(&image_b64))
    }
}
