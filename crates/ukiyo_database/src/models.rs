//! Diesel row types for the story tables and their conversions.

use crate::schema::{stories, story_blocks};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;
use tracing::warn;
use ukiyo_core::{
    BlockAddress, NewStory, ProviderId, StoryBlock, StoryFields, StoryRecord, StorySummary,
};
use ukiyo_error::{DatabaseError, DatabaseErrorKind};

/// Database row for the stories table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = stories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryRow {
    pub id: i32,
    pub user_prompt: String,
    pub plot_system_prompt: String,
    pub story_system_prompt: String,
    pub final_story_raw: String,
    pub provider: String,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the stories table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stories)]
pub struct NewStoryRow<'a> {
    pub user_prompt: &'a str,
    pub plot_system_prompt: &'a str,
    pub story_system_prompt: &'a str,
    pub final_story_raw: &'a str,
    pub provider: &'a str,
}

/// Listing projection of the stories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StorySummaryRow {
    pub id: i32,
    pub user_prompt: String,
    pub created_at: NaiveDateTime,
}

/// Database row for the story_blocks table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Associations)]
#[diesel(belongs_to(StoryRow, foreign_key = story_id))]
#[diesel(table_name = story_blocks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryBlockRow {
    pub id: i32,
    pub story_id: i32,
    pub page: i32,
    pub block: i32,
    pub content: String,
    pub dialogue: Option<String>,
}

/// Insertable struct for the story_blocks table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = story_blocks)]
pub struct NewStoryBlockRow {
    pub story_id: i32,
    pub page: i32,
    pub block: i32,
    pub content: String,
    pub dialogue: Option<String>,
}

impl<'a> From<&'a NewStory> for NewStoryRow<'a> {
    fn from(story: &'a NewStory) -> Self {
        Self {
            user_prompt: &story.user_prompt,
            plot_system_prompt: &story.plot_system_prompt,
            story_system_prompt: &story.story_system_prompt,
            final_story_raw: &story.final_story_raw,
            provider: story.provider.as_ref(),
        }
    }
}

/// Convert a block address to the `(page, block)` column pair.
pub fn address_columns(address: BlockAddress) -> Result<(i32, i32), DatabaseError> {
    let page = i32::try_from(address.page);
    let block = i32::try_from(address.block);
    match (page, block) {
        (Ok(page), Ok(block)) => Ok((page, block)),
        _ => Err(DatabaseError::new(DatabaseErrorKind::Query(format!(
            "Block address {address} is out of range"
        )))),
    }
}

impl NewStoryBlockRow {
    /// Row for one block of story `story_id`.
    pub fn from_block(story_id: i32, block: &StoryBlock) -> Result<Self, DatabaseError> {
        let (page, index) = address_columns(block.address)?;
        Ok(Self {
            story_id,
            page,
            block: index,
            content: block.content.clone(),
            dialogue: block.dialogue.clone(),
        })
    }
}

/// Rebuild block fields from stored rows.
pub fn rows_to_fields(rows: Vec<StoryBlockRow>) -> StoryFields {
    let mut fields = StoryFields::new();
    for row in rows {
        let (Ok(page), Ok(block)) = (u32::try_from(row.page), u32::try_from(row.block)) else {
            warn!(
                story_id = row.story_id,
                row_id = row.id,
                "Skipping block row with invalid address"
            );
            continue;
        };
        let address = BlockAddress::new(page, block);
        fields.insert_content(address, row.content);
        if let Some(dialogue) = row.dialogue {
            fields.insert_dialogue(address, dialogue);
        }
    }
    fields
}

/// Combine a story row with its block rows.
pub fn rows_to_record(
    row: StoryRow,
    blocks: Vec<StoryBlockRow>,
) -> Result<StoryRecord, DatabaseError> {
    let provider = ProviderId::from_str(&row.provider).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Query(format!(
            "Story {} has unknown provider '{}'",
            row.id, row.provider
        )))
    })?;

    Ok(StoryRecord {
        id: row.id,
        created_at: row.created_at.and_utc(),
        user_prompt: row.user_prompt,
        plot_system_prompt: row.plot_system_prompt,
        story_system_prompt: row.story_system_prompt,
        final_story_raw: row.final_story_raw,
        provider,
        fields: rows_to_fields(blocks),
    })
}

impl From<StorySummaryRow> for StorySummary {
    fn from(row: StorySummaryRow) -> Self {
        Self {
            id: row.id,
            user_prompt: row.user_prompt,
            created_at: row.created_at.and_utc(),
        }
    }
}
