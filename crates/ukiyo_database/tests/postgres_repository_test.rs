//! Tests for the PostgreSQL story repository.
//!
//! These need a reachable database in `DATABASE_URL` and only run with
//! `--features postgres-tests`.

#![cfg(feature = "postgres-tests")]

use ukiyo_core::{BlockAddress, NewStory, ProviderId, StoryFields};
use ukiyo_database::{PostgresStoryRepository, establish_pool};
use ukiyo_error::{DatabaseErrorKind, UkiyoErrorKind};
use ukiyo_interface::StoryRepository;

async fn repository() -> anyhow::Result<PostgresStoryRepository> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL")?;
    let repo = PostgresStoryRepository::new(establish_pool(&url, 2)?);
    repo.migrate().await?;
    Ok(repo)
}

fn story(fields: StoryFields) -> anyhow::Result<NewStory> {
    Ok(NewStory::builder()
        .user_prompt("Лиса и старик")
        .plot_system_prompt("plot system")
        .story_system_prompt("story system")
        .final_story_raw("Страница 1, Блок 1\nЛиса.\n\nСтраница 2, Блок 1\nСтарик.")
        .provider(ProviderId::NovitaAi)
        .fields(fields)
        .build()?)
}

fn database_kind(err: &ukiyo_error::UkiyoError) -> Option<&DatabaseErrorKind> {
    match err.kind() {
        UkiyoErrorKind::Database(e) => Some(&e.kind),
        _ => None,
    }
}

#[tokio::test]
async fn test_insert_and_load_round_trip() -> anyhow::Result<()> {
    let repo = repository().await?;
    let fields = StoryFields::from_named([("p1_b1", "Лиса."), ("p2_b1", "Старик.")]);

    let id = repo.insert(&story(fields.clone())?).await?;
    let record = repo.get_by_id(id).await?;

    assert_eq!(record.fields, fields);
    assert_eq!(record.provider, ProviderId::NovitaAi);
    assert_eq!(record.user_prompt, "Лиса и старик");
    Ok(())
}

#[tokio::test]
async fn test_update_adds_dialogue_and_upserts_content() -> anyhow::Result<()> {
    let repo = repository().await?;
    let id = repo
        .insert(&story(StoryFields::from_named([("p2_b1", "Старик.")]))?)
        .await?;

    let update = StoryFields::from_named([
        ("p2_b1_dialogue", "— Кто там?"),
        ("p3_b1", "Рассвет."),
    ]);
    repo.update(id, &update).await?;

    let record = repo.get_by_id(id).await?;
    assert_eq!(record.fields.dialogue(BlockAddress::new(2, 1)), Some("— Кто там?"));
    assert_eq!(record.fields.content(BlockAddress::new(3, 1)), Some("Рассвет."));
    Ok(())
}

#[tokio::test]
async fn test_orphan_dialogue_rejects_whole_update() -> anyhow::Result<()> {
    let repo = repository().await?;
    let id = repo
        .insert(&story(StoryFields::from_named([("p2_b1", "Старик.")]))?)
        .await?;

    let update =
        StoryFields::from_named([("p2_b1_dialogue", "— Да?"), ("p4_b1_dialogue", "— Нет.")]);
    let err = repo.update(id, &update).await.unwrap_err();

    assert!(matches!(
        database_kind(&err),
        Some(DatabaseErrorKind::OrphanDialogue(_))
    ));
    let record = repo.get_by_id(id).await?;
    assert!(record.fields.dialogues().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_story_is_not_found() -> anyhow::Result<()> {
    let repo = repository().await?;

    let err = repo.get_by_id(i32::MAX).await.unwrap_err();

    assert_eq!(
        database_kind(&err),
        Some(&DatabaseErrorKind::StoryNotFound(i32::MAX))
    );
    Ok(())
}

#[tokio::test]
async fn test_list_recent_newest_first() -> anyhow::Result<()> {
    let repo = repository().await?;
    let first = repo.insert(&story(StoryFields::new())?).await?;
    let second = repo.insert(&story(StoryFields::new())?).await?;

    let recent = repo.list_recent(50).await?;
    let position = |id| recent.iter().position(|s| s.id == id);

    assert!(recent.len() >= 2);
    assert!(position(second) < position(first));
    assert!(position(second).is_some());
    Ok(())
}
