//! Text completion with primary/fallback provider tiers.

use super::{CandidateChain, FailurePolicy};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use ukiyo_core::{Completion, CompletionRequest, ProviderId};
use ukiyo_error::{ConfigError, GatewayError, GatewayErrorKind, UkiyoResult};
use ukiyo_interface::{TextBackend, TextCompleter};

/// One provider with its ordered candidate models.
#[derive(Clone)]
pub struct ProviderTier {
    backend: Arc<dyn TextBackend>,
    models: Vec<String>,
    policy: FailurePolicy,
}

impl std::fmt::Debug for ProviderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderTier")
            .field("provider", &self.backend.provider())
            .field("models", &self.models)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ProviderTier {
    /// Tier with the default failure policy.
    pub fn new(backend: Arc<dyn TextBackend>, models: Vec<String>) -> Self {
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

    /// Provider behind this tier.
    pub fn provider(&self) -> ProviderId {
        self.backend.provider()
    }

    /// Candidate models in order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let provider = self.backend.provider();
        let backend = &self.backend;
        let (text, model) = CandidateChain::new(provider, &self.models, self.policy)
            .run(|model| async move { backend.complete(&model, request).await })
            .await?;
        Ok(Completion {
            text,
            provider,
            model,
        })
    }
}

/// Sampling parameters applied to every text request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Token cap (sent to backends that accept one)
    pub max_tokens: u32,
    /// Presence penalty (sent to backends that accept one)
    pub presence_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            max_tokens: 4096,
            presence_penalty: 0.2,
        }
    }
}

/// Text completion that falls back from a primary to a secondary provider.
///
/// The primary tier runs first. Any failure there hands the request to the
/// fallback tier. When both fail the returned error carries both causes.
#[derive(Debug, Clone)]
pub struct TextGateway {
    primary: ProviderTier,
    fallback: ProviderTier,
    sampling: SamplingParams,
}

impl TextGateway {
    /// Gateway with default sampling parameters.
    pub fn new(primary: ProviderTier, fallback: ProviderTier) -> Self {
        Self {
            primary,
            fallback,
            sampling: SamplingParams::default(),
        }
    }

    /// Replace the sampling parameters.
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    fn request(&self, system_prompt: &str, user_prompt: &str) -> UkiyoResult<CompletionRequest> {
        CompletionRequest::builder()
            .system_prompt(system_prompt)
            .user_prompt(user_prompt)
            .temperature(self.sampling.temperature)
            .max_tokens(self.sampling.max_tokens)
            .presence_penalty(self.sampling.presence_penalty)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid completion request: {e}")).into())
    }
}

#[async_trait]
impl TextCompleter for TextGateway {
    #[instrument(
        skip_all,
        fields(primary = %self.primary.provider(), fallback = %self.fallback.provider())
    )]
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> UkiyoResult<Completion> {
        let request = self.request(system_prompt, user_prompt)?;

        let primary_err = match self.primary.complete(&request).await {
            Ok(completion) => return Ok(completion),
            Err(err) => err,
        };
        warn!(error = %primary_err.kind, "Primary provider failed, falling back");

        match self.fallback.complete(&request).await {
            Ok(completion) => {
                info!(
                    provider = %completion.provider,
                    model = %completion.model,
                    "Fallback provider succeeded"
                );
                Ok(completion)
            }
            Err(fallback_err) => Err(GatewayError::new(GatewayErrorKind::AllTiersFailed {
                primary: Box::new(primary_err),
                fallback: Box::new(fallback_err),
            })
            .into()),
        }
    }
}
