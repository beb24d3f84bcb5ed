//! Layered configuration for ukiyo.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`ukiyo.toml` shipped with the crate)
//! 2. User config in the home directory (`~/.config/ukiyo/ukiyo.toml`)
//! 3. User config in the current directory (`./ukiyo.toml`)
//! 4. A file passed explicitly (`--config`)
//! 5. Environment variables `UKIYO__SECTION__KEY`
//!
//! Credentials that are absent from every layer fall back to the conventional
//! environment variables (`GEMINI_API_KEY`, `NOVITA_API_KEY`,
//! `NOVITA_IMAGE_API_KEY`, `DATABASE_URL`).

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use ukiyo_error::{ConfigError, UkiyoResult};
use ukiyo_models::{GEMINI_API_BASE, NOVITA_CHAT_URL, NOVITA_IMAGE_URL, SamplingParams};
use ukiyo_narrative::StoryLayout;

const DEFAULT_CONFIG: &str = include_str!("../ukiyo.toml");

/// Google Gemini settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; falls back to `GEMINI_API_KEY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// REST endpoint root
    pub base_url: String,
    /// Models tried in order
    pub models: Vec<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_API_BASE.to_string(),
            models: Vec::new(),
        }
    }
}

/// Novita AI settings, shared by the text fallback and the image gateway.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NovitaConfig {
    /// Chat API key; falls back to `NOVITA_API_KEY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Image API key; falls back to `NOVITA_IMAGE_API_KEY`, then the chat key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_api_key: Option<String>,
    /// Chat completions endpoint
    pub chat_url: String,
    /// Text-to-image endpoint
    pub image_url: String,
    /// Text models tried in order
    pub text_models: Vec<String>,
    /// Image models tried in order
    pub image_models: Vec<String>,
}

impl Default for NovitaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            image_api_key: None,
            chat_url: NOVITA_CHAT_URL.to_string(),
            image_url: NOVITA_IMAGE_URL.to_string(),
            text_models: Vec::new(),
            image_models: Vec::new(),
        }
    }
}

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Blocks per page, page 1 first
    pub layout: Vec<u32>,
    /// Sampling temperature
    pub temperature: f32,
    /// Token cap for providers that accept one
    pub max_tokens: u32,
    /// Presence penalty for providers that accept one
    pub presence_penalty: f32,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let sampling = SamplingParams::default();
        Self {
            layout: StoryLayout::default().blocks_per_page().clone(),
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            presence_penalty: sampling.presence_penalty,
            request_timeout_secs: 120,
        }
    }
}

/// PostgreSQL settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; falls back to `DATABASE_URL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Maximum pooled connections
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 4,
        }
    }
}

/// Top-level ukiyo configuration.
///
/// # Example
///
/// ```no_run
/// use ukiyo::UkiyoConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = UkiyoConfig::load(None)?;
/// println!("Fallback models: {}", config.novita.text_models.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UkiyoConfig {
    /// Primary text provider
    pub gemini: GeminiConfig,
    /// Fallback text provider and image provider
    pub novita: NovitaConfig,
    /// Generation settings
    pub pipeline: PipelineConfig,
    /// Persistence settings
    pub database: DatabaseConfig,
}

impl UkiyoConfig {
    /// Load every layer, with `explicit` (if any) above the user files.
    #[instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> UkiyoResult<Self> {
        let working_dir = std::env::current_dir()
            .map_err(|e| ConfigError::new(format!("Cannot read current directory: {e}")))?;
        Self::load_from(dirs::home_dir().as_deref(), &working_dir, explicit)
    }

    /// Load every layer using the given home and working directories.
    pub fn load_from(
        home_dir: Option<&Path>,
        working_dir: &Path,
        explicit: Option<&Path>,
    ) -> UkiyoResult<Self> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = home_dir {
            let home_config: PathBuf = home.join(".config/ukiyo/ukiyo.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::from(working_dir.join("ukiyo.toml")).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("UKIYO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")).into())
    }

    /// Load a single file on its own, without the bundled defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> UkiyoResult<Self> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {e}",
                    path.as_ref().display()
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")).into())
    }

    /// Gemini API key from config or `GEMINI_API_KEY`.
    pub fn gemini_api_key(&self) -> UkiyoResult<String> {
        resolve(&self.gemini.api_key, &["GEMINI_API_KEY"], "gemini.api_key")
    }

    /// Novita chat key from config or `NOVITA_API_KEY`.
    pub fn novita_api_key(&self) -> UkiyoResult<String> {
        resolve(&self.novita.api_key, &["NOVITA_API_KEY"], "novita.api_key")
    }

    /// Novita image key, falling back to the chat key.
    pub fn novita_image_api_key(&self) -> UkiyoResult<String> {
        let explicit = self.novita.image_api_key.clone().or(self.novita.api_key.clone());
        resolve(
            &explicit,
            &["NOVITA_IMAGE_API_KEY", "NOVITA_API_KEY"],
            "novita.image_api_key",
        )
    }

    /// Database URL from config or `DATABASE_URL`.
    pub fn database_url(&self) -> UkiyoResult<String> {
        resolve(&self.database.url, &["DATABASE_URL"], "database.url")
    }

    /// Validated page layout.
    pub fn layout(&self) -> UkiyoResult<StoryLayout> {
        StoryLayout::new(self.pipeline.layout.clone())
    }

    /// Sampling parameters for the text gateway.
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.pipeline.temperature,
            max_tokens: self.pipeline.max_tokens,
            presence_penalty: self.pipeline.presence_penalty,
        }
    }

    /// Per-request timeout; zero is rejected.
    pub fn request_timeout(&self) -> UkiyoResult<Duration> {
        match self.pipeline.request_timeout_secs {
            0 => Err(ConfigError::new("pipeline.request_timeout_secs must be positive").into()),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

/// First non-blank value among the configured one and the environment variables.
fn resolve(configured: &Option<String>, env_vars: &[&str], key: &str) -> UkiyoResult<String> {
    if let Some(value) = configured.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }
    env_vars
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| {
            ConfigError::missing(key, env_vars.first().copied().unwrap_or_default()).into()
        })
}
