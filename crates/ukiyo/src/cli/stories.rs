//! Stored story command handlers.

use super::{OutputFormat, render};
use ukiyo::{StoryRepository, UkiyoConfig, UkiyoResult, assembly};

/// Print one story.
pub async fn show(config: &UkiyoConfig, id: i32, format: OutputFormat) -> UkiyoResult<()> {
    let repository = assembly::postgres_repository(config).await?;
    let record = repository.get_by_id(id).await?;
    println!("{}", render::story(&record, format)?);
    Ok(())
}

/// Print the most recent stories.
pub async fn list(config: &UkiyoConfig, limit: usize, format: OutputFormat) -> UkiyoResult<()> {
    let repository = assembly::postgres_repository(config).await?;
    let stories = repository.list_recent(limit).await?;
    println!("{}", render::summaries(&stories, format)?);
    Ok(())
}

/// Apply pending migrations.
pub async fn migrate(config: &UkiyoConfig) -> UkiyoResult<()> {
    assembly::postgres_repository(config).await?.migrate().await?;
    println!("Migrations applied.");
    Ok(())
}
