//! Test utilities for gateway tests.
//!
//! Mock backends answer per model name and record every model they were asked for.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ukiyo_core::{CompletionRequest, ImageRequest, ProviderId};
use ukiyo_error::{ProviderError, ProviderErrorKind, ProviderResult};
use ukiyo_interface::{ImageBackend, TextBackend};

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(ProviderErrorKind),
}

impl MockResponse {
    fn into_result(self) -> ProviderResult<String> {
        match self {
            MockResponse::Success(text) => Ok(text),
            MockResponse::Error(kind) => Err(ProviderError::new(kind)),
        }
    }
}

/// Shorthand for common failures.
pub fn unauthorized() -> MockResponse {
    MockResponse::Error(ProviderErrorKind::Unauthorized {
        status: 401,
        message: "invalid api key".to_string(),
    })
}

pub fn model_not_found(model: &str) -> MockResponse {
    MockResponse::Error(ProviderErrorKind::ModelNotFound(model.to_string()))
}

pub fn server_error() -> MockResponse {
    MockResponse::Error(ProviderErrorKind::Api {
        status: 503,
        message: "overloaded".to_string(),
    })
}

/// Mock backend shared by the text and image tests.
#[derive(Clone)]
pub struct MockBackend {
    provider: ProviderId,
    responses: HashMap<String, MockResponse>,
    default: MockResponse,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Backend where every model fails with a server error unless configured.
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            responses: HashMap::new(),
            default: server_error(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend where every model succeeds with `text`.
    pub fn always(provider: ProviderId, text: &str) -> Self {
        Self::new(provider).otherwise(MockResponse::Success(text.to_string()))
    }

    /// Configure the response for one model.
    pub fn on(mut self, model: &str, response: MockResponse) -> Self {
        self.responses.insert(model.to_string(), response);
        self
    }

    /// Response for models without an explicit entry.
    pub fn otherwise(mut self, response: MockResponse) -> Self {
        self.default = response;
        self
    }

    /// Models called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, model: &str) -> ProviderResult<String> {
        self.calls.lock().unwrap().push(model.to_string());
        self.responses
            .get(model)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
            .into_result()
    }
}

#[async_trait]
impl TextBackend for MockBackend {
    async fn complete(&self, model: &str, _request: &CompletionRequest) -> ProviderResult<String> {
        tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        self.respond(model)
    }

    fn provider(&self) -> ProviderId {
        self.provider
    }
}

#[async_trait]
impl ImageBackend for MockBackend {
    async fn render(&self, model: &str, _request: &ImageRequest) -> ProviderResult<String> {
        tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        self.respond(model)
    }

    fn provider(&self) -> ProviderId {
        self.provider
    }
}

/// Model list helper.
pub fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
