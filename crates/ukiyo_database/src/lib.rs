//! PostgreSQL persistence for ukiyo.
//!
//! Stories are stored in two tables: `stories` holds the prompts, the raw
//! story text and the provider; `story_blocks` holds one row per
//! `(page, block)` with the block's content and optional dialogue.
//!
//! # Example
//!
//! ```rust,ignore
//! use ukiyo_database::{PostgresStoryRepository, establish_pool};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool(&std::env::var("DATABASE_URL")?, 4)?;
//! let repo = PostgresStoryRepository::new(pool);
//! repo.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod connection;
mod models;
mod story_repository;

// Public modules for external access
pub mod schema;

pub use connection::{DbPool, establish_pool, run_migrations};
pub use models::{NewStoryBlockRow, NewStoryRow, StoryBlockRow, StoryRow, StorySummaryRow};
pub use story_repository::PostgresStoryRepository;

use ukiyo_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
