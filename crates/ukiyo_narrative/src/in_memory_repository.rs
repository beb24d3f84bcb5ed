//! In-memory implementation of StoryRepository.
//!
//! Backs the `--memory` CLI mode and the pipeline tests. All data is lost
//! when the repository is dropped.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use ukiyo_core::{NewStory, StoryFields, StoryRecord, StorySummary};
use ukiyo_error::{DatabaseError, DatabaseErrorKind, UkiyoResult};
use ukiyo_interface::StoryRepository;

/// HashMap-backed story repository.
///
/// Applies the same field rules as the Postgres repository: dialogue is only
/// accepted for blocks that have content.
///
/// # Example
/// ```
/// use ukiyo_core::{NewStory, ProviderId, StoryFields};
/// use ukiyo_interface::StoryRepository;
/// use ukiyo_narrative::InMemoryStoryRepository;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryStoryRepository::new();
/// let story = NewStory::builder()
///     .user_prompt("prompt")
///     .plot_system_prompt("plot")
///     .story_system_prompt("story")
///     .final_story_raw("Страница 1, Блок 1\nText")
///     .provider(ProviderId::Gemini)
///     .fields(StoryFields::from_named([("p1_b1", "Text")]))
///     .build()?;
///
/// let id = repo.insert(&story).await?;
/// assert_eq!(repo.get_by_id(id).await?.fields.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStoryRepository {
    stories: Arc<RwLock<HashMap<i32, StoryRecord>>>,
    next_id: Arc<RwLock<i32>>,
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            stories: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Number of stored stories.
    pub async fn len(&self) -> usize {
        self.stories.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.stories.read().await.is_empty()
    }
}

fn reject_orphans(fields: &StoryFields) -> UkiyoResult<()> {
    match fields.orphan_dialogue().first() {
        Some(orphan) => {
            Err(DatabaseError::new(DatabaseErrorKind::OrphanDialogue(orphan.to_string())).into())
        }
        None => Ok(()),
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    #[instrument(skip_all, fields(fields = story.fields.len()))]
    async fn insert(&self, story: &NewStory) -> UkiyoResult<i32> {
        reject_orphans(&story.fields)?;

        let mut next_id = self.next_id.write().await;
        let id = *next_id;
        *next_id += 1;

        let record = StoryRecord::from_new(id, Utc::now(), story.clone());
        self.stories.write().await.insert(id, record);
        debug!(id, "Story stored in memory");
        Ok(id)
    }

    #[instrument(skip(self, fields), fields(fields = fields.len()))]
    async fn update(&self, id: i32, fields: &StoryFields) -> UkiyoResult<()> {
        let mut stories = self.stories.write().await;
        let record = stories
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::StoryNotFound(id)))?;

        let mut merged = record.fields.clone();
        merged.merge(fields);
        reject_orphans(&merged)?;

        record.fields = merged;
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> UkiyoResult<StoryRecord> {
        self.stories
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::StoryNotFound(id)).into())
    }

    async fn list_recent(&self, limit: usize) -> UkiyoResult<Vec<StorySummary>> {
        let stories = self.stories.read().await;
        let mut records: Vec<&StoryRecord> = stories.values().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records
            .into_iter()
            .take(limit)
            .map(StorySummary::from)
            .collect())
    }
}
