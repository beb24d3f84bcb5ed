//! Client for OpenAI-style chat completion endpoints.
//!
//! Novita AI exposes its text models through this format; any other
//! compatible endpoint works the same way with a different base URL.

mod client;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{ChatMessage, ChatRequest, ChatResponse};
pub(crate) use client::classify_failure;
