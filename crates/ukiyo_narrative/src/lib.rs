//! Story generation pipeline for ukiyo.
//!
//! A run turns one user prompt into a stored manga story in four stages:
//! a plot outline, the full story written against that outline, a stored
//! record with one content field per `Страница N, Блок M` block, and
//! dialogue for the blocks on even pages.
//!
//! # Features
//!
//! - **Marker parsing**: [`extract_blocks`], [`extract_dialogue`] and the
//!   display-oriented [`parse_story_for_display`]
//! - **Pipeline**: [`StoryPipeline`] with typed [`Progress`] events
//! - **Sessions**: [`GenerationSession`] aborts a run when a newer one starts
//! - **Illustration**: [`Illustrator`] renders blocks sequentially into an
//!   [`IllustrationCache`]
//! - **In-memory storage**: [`InMemoryStoryRepository`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ukiyo_narrative::{GenerationSession, InMemoryStoryRepository, StoryPipeline};
//!
//! # async fn example(gateway: Arc<dyn ukiyo_interface::TextCompleter>) -> ukiyo_error::UkiyoResult<()> {
//! let pipeline = StoryPipeline::new(gateway, Arc::new(InMemoryStoryRepository::new()));
//! let session = GenerationSession::new(Arc::new(pipeline));
//!
//! let mut run = session.start("Кицунэ открывает чайный дом");
//! while let Some(event) = run.progress.recv().await {
//!     println!("{}", event.message());
//! }
//! let outcome = run.outcome().await?;
//! println!("Stored story {}", outcome.story_id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod illustrator;
mod in_memory_repository;
mod markers;
mod orchestrator;
mod progress;
mod prompts;
mod session;

pub use illustrator::{IllustrationCache, IllustrationProgress, IllustrationReport, Illustrator};
pub use in_memory_repository::InMemoryStoryRepository;
pub use markers::{
    PROLOGUE_BLOCK_LABEL, PROLOGUE_PAGE_LABEL, UNSTRUCTURED_BLOCK_LABEL, UNSTRUCTURED_PAGE_LABEL,
    extract_blocks, extract_dialogue, pages_from_fields, parse_story_for_display,
    reconstruct_for_display, render_blocks, story_prologue,
};
pub use orchestrator::StoryPipeline;
pub use progress::{DialogueSkip, Progress, RunOutcome, RunStatus, Stage};
pub use prompts::{
    DIALOGUE_USER_PROMPT, PLOT_BEGIN, PLOT_END, PLOT_USER_PROMPT, STORY_USER_PROMPT, StoryLayout,
    dialogue_system_prompt, plot_system_prompt, story_system_prompt,
};
pub use session::{GenerationRun, GenerationSession, PROGRESS_BUFFER};
