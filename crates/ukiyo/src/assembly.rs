//! Wiring configuration into gateways, repositories and the pipeline.

use crate::UkiyoConfig;
use std::sync::Arc;
use tracing::{info, warn};
use ukiyo_core::ProviderId;
use ukiyo_database::{PostgresStoryRepository, establish_pool};
use ukiyo_error::{DatabaseError, DatabaseErrorKind, UkiyoResult};
use ukiyo_interface::{StoryRepository, TextCompleter};
use ukiyo_models::{
    GeminiClient, ImageGateway, NovitaImageClient, OpenAICompatibleClient, ProviderTier,
    TextGateway, build_http_client,
};
use ukiyo_narrative::{InMemoryStoryRepository, StoryPipeline};

/// Key for a backend, or an empty key that fails at request time.
///
/// A missing key is a credential failure for that provider alone, so the
/// other provider can still serve the request.
fn key_or_empty(key: UkiyoResult<String>, provider: ProviderId) -> String {
    key.unwrap_or_else(|e| {
        warn!(%provider, error = %e, "No API key configured");
        String::new()
    })
}

/// HTTP client with the configured request timeout.
pub fn http_client(config: &UkiyoConfig) -> UkiyoResult<reqwest::Client> {
    build_http_client(config.request_timeout()?)
}

/// Gemini first, then the Novita model list.
pub fn text_gateway(config: &UkiyoConfig, http: &reqwest::Client) -> TextGateway {
    let gemini = GeminiClient::new(
        http.clone(),
        key_or_empty(config.gemini_api_key(), ProviderId::Gemini),
    )
    .with_base_url(config.gemini.base_url.clone());

    let novita = OpenAICompatibleClient::new(
        http.clone(),
        key_or_empty(config.novita_api_key(), ProviderId::NovitaAi),
        config.novita.chat_url.clone(),
        ProviderId::NovitaAi,
    );

    TextGateway::new(
        ProviderTier::new(Arc::new(gemini), config.gemini.models.clone()),
        ProviderTier::new(Arc::new(novita), config.novita.text_models.clone()),
    )
    .with_sampling(config.sampling())
}

/// Novita text-to-image over the configured model list.
pub fn image_gateway(config: &UkiyoConfig, http: &reqwest::Client) -> ImageGateway {
    let client = NovitaImageClient::new(
        http.clone(),
        key_or_empty(config.novita_image_api_key(), ProviderId::NovitaAi),
    )
    .with_url(config.novita.image_url.clone());
    ImageGateway::new(Arc::new(client), config.novita.image_models.clone())
}

/// Connect to PostgreSQL.
pub async fn postgres_repository(config: &UkiyoConfig) -> UkiyoResult<PostgresStoryRepository> {
    let url = config.database_url()?;
    let pool_size = config.database.pool_size;
    let pool = tokio::task::spawn_blocking(move || establish_pool(&url, pool_size))
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Worker(e.to_string())))??;
    info!(pool_size, "Connected to PostgreSQL");
    Ok(PostgresStoryRepository::new(pool))
}

/// The repository a command should use.
pub async fn story_repository(
    config: &UkiyoConfig,
    in_memory: bool,
) -> UkiyoResult<Arc<dyn StoryRepository>> {
    if in_memory {
        info!("Using in-memory story repository");
        return Ok(Arc::new(InMemoryStoryRepository::new()));
    }
    Ok(Arc::new(postgres_repository(config).await?))
}

/// Pipeline with the configured layout.
pub fn story_pipeline(
    config: &UkiyoConfig,
    text: Arc<dyn TextCompleter>,
    repository: Arc<dyn StoryRepository>,
) -> UkiyoResult<StoryPipeline> {
    Ok(StoryPipeline::new(text, repository).with_layout(config.layout()?))
}
