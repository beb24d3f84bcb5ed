//! Repository trait for story persistence.

use async_trait::async_trait;
use ukiyo_core::{NewStory, StoryFields, StoryRecord, StorySummary};
use ukiyo_error::UkiyoResult;

/// Storage for generated stories.
///
/// Implementations never retry internally; every failure is reported to the
/// caller, which decides whether it is fatal.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Persist a new story with its content fields and return its id.
    ///
    /// The story row and all block fields are written atomically.
    async fn insert(&self, story: &NewStory) -> UkiyoResult<i32>;

    /// Merge block fields into an existing story.
    ///
    /// Content fields are created or replaced. Dialogue fields must refer to
    /// blocks that already have content (either stored or in the same update),
    /// otherwise the whole update is rejected.
    async fn update(&self, id: i32, fields: &StoryFields) -> UkiyoResult<()>;

    /// Load a story with all of its fields.
    async fn get_by_id(&self, id: i32) -> UkiyoResult<StoryRecord>;

    /// Most recent stories first, at most `limit` of them.
    async fn list_recent(&self, limit: usize) -> UkiyoResult<Vec<StorySummary>>;
}
