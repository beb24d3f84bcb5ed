//! Story records and their dynamic block fields.

use crate::{BlockAddress, FieldKey, FieldKind, ProviderId};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// The dynamic `pN_bM` / `pN_bM_dialogue` fields of a story.
///
/// This is the exchange format between the structured-text parser and the
/// repositories. Keys iterate in reading order, content before dialogue.
///
/// # Examples
///
/// ```
/// use ukiyo_core::{BlockAddress, StoryFields};
///
/// let mut fields = StoryFields::new();
/// fields.insert_content(BlockAddress::new(2, 1), "Rain on the harbor.");
/// fields.insert_dialogue(BlockAddress::new(2, 1), "\"We're late.\"");
///
/// let names: Vec<String> = fields.iter().map(|(k, _)| k.to_string()).collect();
/// assert_eq!(names, ["p2_b1", "p2_b1_dialogue"]);
/// assert_eq!(fields.blocks()[0].dialogue.as_deref(), Some("\"We're late.\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryFields(BTreeMap<FieldKey, String>);

impl StoryFields {
    /// Empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs, ignoring names that are not block fields.
    pub fn from_named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .filter_map(|(name, value)| FieldKey::parse(name.as_ref()).map(|k| (k, value.into())))
            .collect()
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) -> Option<String> {
        self.0.insert(key, value.into())
    }

    /// Set a block's narrative.
    pub fn insert_content(
        &mut self,
        address: BlockAddress,
        text: impl Into<String>,
    ) -> Option<String> {
        self.insert(FieldKey::content(address), text)
    }

    /// Set a block's dialogue.
    pub fn insert_dialogue(
        &mut self,
        address: BlockAddress,
        text: impl Into<String>,
    ) -> Option<String> {
        self.insert(FieldKey::dialogue(address), text)
    }

    /// Look up a field.
    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Narrative of a block.
    pub fn content(&self, address: BlockAddress) -> Option<&str> {
        self.get(&FieldKey::content(address))
    }

    /// Dialogue of a block.
    pub fn dialogue(&self, address: BlockAddress) -> Option<&str> {
        self.get(&FieldKey::dialogue(address))
    }

    /// Whether the block has a narrative field.
    pub fn has_content(&self, address: BlockAddress) -> bool {
        self.0.contains_key(&FieldKey::content(address))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All fields in reading order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Addresses that carry a narrative, in reading order.
    pub fn content_addresses(&self) -> Vec<BlockAddress> {
        self.0
            .keys()
            .filter(|k| k.kind == FieldKind::Content)
            .map(|k| k.address)
            .collect()
    }

    /// Only the dialogue fields.
    pub fn dialogues(&self) -> StoryFields {
        self.iter()
            .filter(|(k, _)| k.kind == FieldKind::Dialogue)
            .map(|(k, v)| (*k, v.to_string()))
            .collect()
    }

    /// Keep only fields matching the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&FieldKey, &str) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    /// Overwrite this set with every field of `other`.
    pub fn merge(&mut self, other: &StoryFields) {
        for (key, value) in other.iter() {
            self.0.insert(*key, value.to_string());
        }
    }

    /// Dialogue keys whose block has no narrative.
    pub fn orphan_dialogue(&self) -> Vec<FieldKey> {
        self.0
            .keys()
            .filter(|k| k.kind == FieldKind::Dialogue && !self.has_content(k.address))
            .copied()
            .collect()
    }

    /// Blocks with narrative, in reading order, with their dialogue attached.
    pub fn blocks(&self) -> Vec<StoryBlock> {
        self.content_addresses()
            .into_iter()
            .filter_map(|address| {
                let content = self.content(address)?.to_string();
                Some(StoryBlock {
                    address,
                    content,
                    dialogue: self.dialogue(address).map(str::to_string),
                })
            })
            .collect()
    }
}

impl FromIterator<(FieldKey, String)> for StoryFields {
    fn from_iter<T: IntoIterator<Item = (FieldKey, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for StoryFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

/// One narrative block with its optional dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryBlock {
    /// Where the block sits
    pub address: BlockAddress,
    /// Narrative text
    pub content: String,
    /// Dialogue text, present only for blocks that received dialogue
    pub dialogue: Option<String>,
}

/// Insert payload for a generated story.
///
/// # Examples
///
/// ```
/// use ukiyo_core::{NewStory, ProviderId, StoryFields};
///
/// let story = NewStory::builder()
///     .user_prompt("A lighthouse keeper finds a letter")
///     .plot_system_prompt("plot instructions")
///     .story_system_prompt("story instructions")
///     .final_story_raw("Страница 1, Блок 1\nThe lamp hums.")
///     .provider(ProviderId::Gemini)
///     .fields(StoryFields::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(story.provider, ProviderId::Gemini);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct NewStory {
    /// What the user asked for
    pub user_prompt: String,
    /// System prompt used for the plot stage
    pub plot_system_prompt: String,
    /// System prompt used for the story stage
    pub story_system_prompt: String,
    /// Story text exactly as the provider returned it
    pub final_story_raw: String,
    /// Provider that wrote the story
    pub provider: ProviderId,
    /// Per-block content fields
    #[builder(default)]
    pub fields: StoryFields,
}

impl NewStory {
    /// Start building a story.
    pub fn builder() -> NewStoryBuilder {
        NewStoryBuilder::default()
    }
}

/// A persisted story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryRecord {
    /// Identifier assigned by the repository
    pub id: i32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// What the user asked for
    pub user_prompt: String,
    /// System prompt used for the plot stage
    pub plot_system_prompt: String,
    /// System prompt used for the story stage
    pub story_system_prompt: String,
    /// Story text exactly as the provider returned it
    pub final_story_raw: String,
    /// Provider that wrote the story
    pub provider: ProviderId,
    /// Per-block content and dialogue fields
    pub fields: StoryFields,
}

impl StoryRecord {
    /// Attach an id and timestamp to an insert payload.
    pub fn from_new(id: i32, created_at: DateTime<Utc>, story: NewStory) -> Self {
        Self {
            id,
            created_at,
            user_prompt: story.user_prompt,
            plot_system_prompt: story.plot_system_prompt,
            story_system_prompt: story.story_system_prompt,
            final_story_raw: story.final_story_raw,
            provider: story.provider,
            fields: story.fields,
        }
    }
}

/// Listing entry for recent stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySummary {
    /// Story identifier
    pub id: i32,
    /// What the user asked for
    pub user_prompt: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl From<&StoryRecord> for StorySummary {
    fn from(record: &StoryRecord) -> Self {
        Self {
            id: record.id,
            user_prompt: record.user_prompt.clone(),
            created_at: record.created_at,
        }
    }
}
