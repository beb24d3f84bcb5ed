//! ukiyo - manga story generation
//!
//! ukiyo turns a short prompt into a paged manga story. A plot outline and
//! the full story are written by Google Gemini, falling back to an ordered
//! list of Novita AI models; the story is split into `Страница N, Блок M`
//! blocks and stored, dialogue is added for even pages, and panels can be
//! illustrated with Novita AI text-to-image.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ukiyo::{UkiyoConfig, assembly};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UkiyoConfig::load(None)?;
//!     let http = assembly::http_client(&config)?;
//!     let text = Arc::new(assembly::text_gateway(&config, &http));
//!     let repository = assembly::story_repository(&config, true).await?;
//!     let pipeline = assembly::story_pipeline(&config, text, repository)?;
//!
//!     let (tx, _rx) = tokio::sync::mpsc::channel(32);
//!     let outcome = pipeline.run("Самурай и лиса-оборотень", &tx).await?;
//!     println!("Stored story {}", outcome.story_id);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `ukiyo_error` - Error types
//! - `ukiyo_core` - Block addresses, story records, requests
//! - `ukiyo_interface` - Backend, completer and repository traits
//! - `ukiyo_models` - Gemini and Novita clients, fallback gateways
//! - `ukiyo_narrative` - Marker parsing, prompts, pipeline, illustration
//! - `ukiyo_database` - PostgreSQL persistence
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use ukiyo_core::*;
pub use ukiyo_database::{PostgresStoryRepository, establish_pool, run_migrations};
pub use ukiyo_error::*;
pub use ukiyo_interface::*;
pub use ukiyo_models::*;
pub use ukiyo_narrative::*;

pub mod assembly;
mod config;
mod observability;
mod panels;

pub use config::{DatabaseConfig, GeminiConfig, NovitaConfig, PipelineConfig, UkiyoConfig};
pub use observability::{ObservabilityConfig, init_observability};
pub use panels::PanelDirectory;
