//! Core data types for ukiyo.
//!
//! These types carry no behavior beyond formatting and parsing. The pipeline,
//! the provider gateways and the repositories all exchange them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod address;
mod display;
mod illustration;
mod provider;
mod request;
mod story;

pub use address::{BlockAddress, FieldKey, FieldKind};
pub use display::{DisplayBlock, DisplayPage};
pub use illustration::Illustration;
pub use provider::ProviderId;
pub use request::{
    Completion, CompletionRequest, CompletionRequestBuilder, ImageRequest, ImageRequestBuilder,
};
pub use story::{NewStory, NewStoryBuilder, StoryBlock, StoryFields, StoryRecord, StorySummary};
