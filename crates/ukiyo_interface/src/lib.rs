//! Trait definitions for ukiyo.
//!
//! Backends talk to a single provider API. Completers sit above them and hide
//! the fallback logic. The pipeline only ever sees completers and a
//! [`StoryRepository`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod repository;
mod traits;

pub use repository::StoryRepository;
pub use traits::{ImageBackend, ImageCompleter, TextBackend, TextCompleter};
