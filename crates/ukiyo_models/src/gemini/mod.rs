//! Google Gemini over the public REST API.
//!
//! Only the `generateContent` call is used: one system instruction, one user
//! turn, temperature from the request. Error bodies are decoded so that
//! rejected keys and unknown models are reported as such instead of as
//! generic HTTP failures.

mod client;
mod dto;

pub use client::{GEMINI_API_BASE, GeminiClient};
