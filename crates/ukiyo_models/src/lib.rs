//! Provider clients and fallback gateways for ukiyo.
//!
//! # Backends
//!
//! - [`GeminiClient`]: Google Gemini `generateContent` over REST
//! - [`OpenAICompatibleClient`]: any OpenAI-style chat endpoint; [`novita_chat_client`]
//!   points it at Novita AI
//! - [`NovitaImageClient`]: Novita AI text-to-image
//!
//! # Gateways
//!
//! [`TextGateway`] tries a primary [`ProviderTier`] and then a fallback tier.
//! [`ImageGateway`] walks an ordered list of image models. Both use the same
//! [`CandidateChain`] and a [`FailurePolicy`] that decides which failures end
//! the chain early.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ukiyo_interface::TextCompleter;
//! use ukiyo_models::{
//!     build_http_client, novita_chat_client, GeminiClient, ProviderTier, TextGateway,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let http = build_http_client(Duration::from_secs(120))?;
//! let gemini = GeminiClient::new(http.clone(), "gemini-key");
//! let novita = novita_chat_client(http, "novita-key");
//!
//! let gateway = TextGateway::new(
//!     ProviderTier::new(Arc::new(gemini), vec!["gemini-3-flash-preview".into()]),
//!     ProviderTier::new(Arc::new(novita), vec!["deepseek/deepseek-v3".into()]),
//! );
//! let completion = gateway.complete("You write manga.", "Write a plot.").await?;
//! println!("{} via {}", completion.text, completion.provider);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gateway;
mod gemini;
mod http;
mod novita;
mod openai_compat;

pub use gateway::{
    CandidateChain, FailureAction, FailurePolicy, ImageGateway, PANEL_NEGATIVE_PROMPT,
    ProviderTier, SamplingParams, TextGateway, panel_prompt,
};
pub use gemini::{GEMINI_API_BASE, GeminiClient};
pub use http::build_http_client;
pub use novita::{NOVITA_CHAT_URL, NOVITA_IMAGE_URL, NovitaImageClient, novita_chat_client};
pub use openai_compat::{ChatMessage, ChatRequest, ChatResponse, OpenAICompatibleClient};
