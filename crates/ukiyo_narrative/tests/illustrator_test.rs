//! Tests for the sequential illustration pass.

mod test_utils;

use std::sync::Arc;
use test_utils::MockImages;
use tokio::sync::mpsc;
use ukiyo_core::{BlockAddress, StoryBlock};
use ukiyo_narrative::{IllustrationCache, IllustrationProgress, Illustrator};

fn block(page: u32, index: u32, content: &str) -> StoryBlock {
    StoryBlock {
        address: BlockAddress::new(page, index),
        content: content.to_string(),
        dialogue: None,
    }
}

fn blocks() -> Vec<StoryBlock> {
    vec![
        block(2, 1, "старик у костра"),
        block(1, 1, "лиса на мосту"),
        block(1, 2, "фонари гаснут"),
    ]
}

async fn drain(mut rx: mpsc::Receiver<IllustrationProgress>) -> Vec<IllustrationProgress> {
    let mut steps = Vec::new();
    while let Some(step) = rx.recv().await {
        steps.push(step);
    }
    steps
}

#[tokio::test]
async fn test_illustrates_in_block_order() -> anyhow::Result<()> {
    let images = MockImages::default();
    let illustrator =
        Illustrator::new(Arc::new(images.clone()), Arc::new(IllustrationCache::new()));

    let (tx, rx) = mpsc::channel(16);
    let report = illustrator.illustrate(&blocks(), &tx).await?;
    drop(tx);
    let steps = drain(rx).await;

    assert_eq!(report.rendered, 3);
    assert_eq!(report.reused, 0);
    assert_eq!(
        images.scenes(),
        vec!["лиса на мосту", "фонари гаснут", "старик у костра"]
    );
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[2].completed, 3);
    assert_eq!(steps[2].total, 3);
    assert_eq!(steps[2].address, BlockAddress::new(2, 1));
    assert_eq!(illustrator.cache().len().await, 3);
    Ok(())
}

#[tokio::test]
async fn test_second_pass_reuses_cache() -> anyhow::Result<()> {
    let images = MockImages::default();
    let illustrator =
        Illustrator::new(Arc::new(images.clone()), Arc::new(IllustrationCache::new()));
    let (tx, _rx) = mpsc::channel(16);

    illustrator.illustrate(&blocks(), &tx).await?;
    let report = illustrator.illustrate(&blocks(), &tx).await?;

    assert_eq!(report.rendered, 0);
    assert_eq!(report.reused, 3);
    assert_eq!(images.scenes().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_failure_stops_pass_and_resume_skips_done_blocks() -> anyhow::Result<()> {
    let images = MockImages::failing_on("фонари гаснут");
    let cache = Arc::new(IllustrationCache::new());
    let illustrator = Illustrator::new(Arc::new(images.clone()), cache.clone());

    let (tx, rx) = mpsc::channel(16);
    let result = illustrator.illustrate(&blocks(), &tx).await;
    drop(tx);
    let steps = drain(rx).await;

    assert!(result.is_err());
    assert_eq!(steps.len(), 1);
    assert!(cache.contains(BlockAddress::new(1, 1)).await);
    assert!(!cache.contains(BlockAddress::new(1, 2)).await);
    assert!(!images.scenes().contains(&"старик у костра".to_string()));

    images.heal();
    let (tx, rx) = mpsc::channel(16);
    let report = illustrator.illustrate(&blocks(), &tx).await?;
    drop(tx);
    let steps = drain(rx).await;

    assert_eq!(report.reused, 1);
    assert_eq!(report.rendered, 2);
    assert!(steps[0].cached);
    assert_eq!(steps[0].completed, 1);
    assert!(!steps[1].cached);
    Ok(())
}

#[tokio::test]
async fn test_cache_entries_are_data_uris() -> anyhow::Result<()> {
    let cache = Arc::new(IllustrationCache::new());
    let illustrator = Illustrator::new(Arc::new(MockImages::default()), cache.clone());
    let (tx, _rx) = mpsc::channel(16);

    illustrator.illustrate(&blocks()[..1], &tx).await?;

    let image = cache.get(BlockAddress::new(2, 1)).await;
    let image = image.expect("cached illustration");
    assert_eq!(image.base64_payload(), Some("iVBORw0KGgo="));
    Ok(())
}
