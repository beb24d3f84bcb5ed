//! Ordered model loop shared by both gateways.

use super::{FailureAction, FailurePolicy};
use std::future::Future;
use tracing::{debug, info, warn};
use ukiyo_core::ProviderId;
use ukiyo_error::{FailureClass, GatewayError, GatewayErrorKind, ProviderResult};

/// Tries each model of one provider in order until one succeeds.
///
/// Every model is attempted at most once per call. The [`FailurePolicy`]
/// decides whether a failure ends the chain.
#[derive(Debug, Clone, Copy)]
pub struct CandidateChain<'a> {
    provider: ProviderId,
    models: &'a [String],
    policy: FailurePolicy,
}

impl<'a> CandidateChain<'a> {
    /// Chain over `models` of `provider`.
    pub fn new(provider: ProviderId, models: &'a [String], policy: FailurePolicy) -> Self {
        Self {
            provider,
            models,
            policy,
        }
    }

    /// Run `attempt` for each model until one returns `Ok`.
    ///
    /// Returns the value together with the model that produced it.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<(T, String), GatewayError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        let provider = self.provider.to_string();
        let mut last = None;

        for (index, model) in self.models.iter().enumerate() {
            debug!(provider = %provider, model = %model, attempt = index + 1, "Trying model");

            let err = match attempt(model.clone()).await {
                Ok(value) => {
                    info!(provider = %provider, model = %model, "Model succeeded");
                    return Ok((value, model.clone()));
                }
                Err(err) => err,
            };

            let class = err.class();
            match self.policy.action(class) {
                FailureAction::Abort if class == FailureClass::Credential => {
                    warn!(
                        provider = %provider,
                        model = %model,
                        error = %err.kind,
                        "Credentials rejected, not trying other models"
                    );
                    return Err(GatewayError::new(GatewayErrorKind::Credential {
                        provider,
                        model: model.clone(),
                        cause: err,
                    }));
                }
                FailureAction::Abort => {
                    warn!(
                        provider = %provider,
                        model = %model,
                        class = %class,
                        error = %err.kind,
                        "Failure policy aborted the chain"
                    );
                    return Err(GatewayError::new(GatewayErrorKind::Exhausted {
                        provider,
                        attempted: index + 1,
                        last: Box::new(err),
                    }));
                }
                FailureAction::Skip => {
                    warn!(
                        provider = %provider,
                        model = %model,
                        class = %class,
                        error = %err.kind,
                        "Model failed, trying next"
                    );
                }
                FailureAction::SkipQuietly => {
                    debug!(
                        provider = %provider,
                        model = %model,
                        class = %class,
                        error = %err.kind,
                        "Model unavailable, trying next"
                    );
                }
            }
            last = Some(err);
        }

        match last {
            Some(err) => Err(GatewayError::new(GatewayErrorKind::Exhausted {
                provider,
                attempted: self.models.len(),
                last: Box::new(err),
            })),
            None => Err(GatewayError::new(GatewayErrorKind::NoCandidates(provider))),
        }
    }
}
