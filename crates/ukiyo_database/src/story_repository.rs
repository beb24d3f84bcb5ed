//! PostgreSQL implementation of StoryRepository.

use crate::connection::{DbPool, run_migrations};
use crate::models::{
    NewStoryBlockRow, NewStoryRow, StoryBlockRow, StoryRow, StorySummaryRow, address_columns,
    rows_to_record,
};
use crate::schema::{stories, story_blocks};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::collections::BTreeSet;
use tracing::{debug, instrument};
use ukiyo_core::{FieldKind, NewStory, StoryFields, StoryRecord, StorySummary};
use ukiyo_error::{DatabaseError, DatabaseErrorKind, UkiyoResult};
use ukiyo_interface::StoryRepository;

/// PostgreSQL implementation of StoryRepository using Diesel ORM.
///
/// Stories live in `stories`; each block's content and dialogue live in one
/// `story_blocks` row. Queries run on tokio's blocking pool with a connection
/// checked out of an r2d2 pool.
///
/// # Example
/// ```no_run
/// use ukiyo_database::{PostgresStoryRepository, establish_pool};
/// use ukiyo_interface::StoryRepository;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = establish_pool("postgres://localhost/ukiyo", 4)?;
///     let repo = PostgresStoryRepository::new(pool);
///     for story in repo.list_recent(10).await? {
///         println!("{} {}", story.id, story.user_prompt);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PostgresStoryRepository {
    pool: DbPool,
}

impl std::fmt::Debug for PostgresStoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStoryRepository")
            .field("state", &self.pool.state())
            .finish()
    }
}

impl PostgresStoryRepository {
    /// Create a repository over an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> UkiyoResult<()> {
        self.with_conn(run_migrations).await
    }

    /// Run `work` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, work: F) -> UkiyoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            work(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Worker(e.to_string())))?;
        Ok(result?)
    }
}

fn reject_orphans(fields: &StoryFields) -> Result<(), DatabaseError> {
    match fields.orphan_dialogue().first() {
        Some(orphan) => Err(DatabaseError::new(DatabaseErrorKind::OrphanDialogue(
            orphan.to_string(),
        ))),
        None => Ok(()),
    }
}

fn stored_addresses(
    conn: &mut PgConnection,
    id: i32,
) -> Result<BTreeSet<(i32, i32)>, DatabaseError> {
    let rows: Vec<(i32, i32)> = story_blocks::table
        .filter(story_blocks::story_id.eq(id))
        .select((story_blocks::page, story_blocks::block))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

fn apply_update(
    conn: &mut PgConnection,
    id: i32,
    fields: &StoryFields,
) -> Result<(), DatabaseError> {
    let exists = stories::table
        .find(id)
        .select(stories::id)
        .first::<i32>(conn)
        .optional()?;
    if exists.is_none() {
        return Err(DatabaseError::new(DatabaseErrorKind::StoryNotFound(id)));
    }

    let mut known = stored_addresses(conn, id)?;

    for (key, text) in fields.iter().filter(|(k, _)| k.kind == FieldKind::Content) {
        let (page, block) = address_columns(key.address)?;
        let row = NewStoryBlockRow {
            story_id: id,
            page,
            block,
            content: text.to_string(),
            dialogue: None,
        };
        diesel::insert_into(story_blocks::table)
            .values(&row)
            .on_conflict((story_blocks::story_id, story_blocks::page, story_blocks::block))
            .do_update()
            .set(story_blocks::content.eq(excluded(story_blocks::content)))
            .execute(conn)?;
        known.insert((page, block));
    }

    for (key, text) in fields.iter().filter(|(k, _)| k.kind == FieldKind::Dialogue) {
        let (page, block) = address_columns(key.address)?;
        if !known.contains(&(page, block)) {
            return Err(DatabaseError::new(DatabaseErrorKind::OrphanDialogue(
                key.to_string(),
            )));
        }
        diesel::update(
            story_blocks::table
                .filter(story_blocks::story_id.eq(id))
                .filter(story_blocks::page.eq(page))
                .filter(story_blocks::block.eq(block)),
        )
        .set(story_blocks::dialogue.eq(Some(text)))
        .execute(conn)?;
    }

    Ok(())
}

#[async_trait]
impl StoryRepository for PostgresStoryRepository {
    #[instrument(skip_all, fields(fields = story.fields.len()))]
    async fn insert(&self, story: &NewStory) -> UkiyoResult<i32> {
        reject_orphans(&story.fields)?;
        let story = story.clone();

        self.with_conn(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let id: i32 = diesel::insert_into(stories::table)
                    .values(NewStoryRow::from(&story))
                    .returning(stories::id)
                    .get_result(conn)?;

                let rows = story
                    .fields
                    .blocks()
                    .iter()
                    .map(|block| NewStoryBlockRow::from_block(id, block))
                    .collect::<Result<Vec<_>, _>>()?;
                if !rows.is_empty() {
                    diesel::insert_into(story_blocks::table)
                        .values(&rows)
                        .execute(conn)?;
                }

                debug!(id, blocks = rows.len(), "Story inserted");
                Ok(id)
            })
        })
        .await
    }

    #[instrument(skip(self, fields), fields(fields = fields.len()))]
    async fn update(&self, id: i32, fields: &StoryFields) -> UkiyoResult<()> {
        let fields = fields.clone();
        self.with_conn(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| apply_update(conn, id, &fields))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> UkiyoResult<StoryRecord> {
        self.with_conn(move |conn| {
            let row: StoryRow = stories::table
                .find(id)
                .select(StoryRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| DatabaseError::new(DatabaseErrorKind::StoryNotFound(id)))?;

            let blocks: Vec<StoryBlockRow> = StoryBlockRow::belonging_to(&row)
                .select(StoryBlockRow::as_select())
                .order((story_blocks::page.asc(), story_blocks::block.asc()))
                .load(conn)?;

            rows_to_record(row, blocks)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: usize) -> UkiyoResult<Vec<StorySummary>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let rows: Vec<StorySummaryRow> = stories::table
                .select(StorySummaryRow::as_select())
                .order((stories::created_at.desc(), stories::id.desc()))
                .limit(limit)
                .load(conn)?;
            Ok(rows.into_iter().map(StorySummary::from).collect())
        })
        .await
    }
}
