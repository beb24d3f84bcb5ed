//! Fallback gateways over provider backends.

mod chain;
mod image;
mod policy;
mod prompt;
mod text;

pub use chain::CandidateChain;
pub use image::ImageGateway;
pub use policy::{FailureAction, FailurePolicy};
pub use prompt::{PANEL_NEGATIVE_PROMPT, panel_prompt};
pub use text::{ProviderTier, SamplingParams, TextGateway};
