//! Illustration command handler.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use ukiyo::{
    IllustrationCache, IllustrationProgress, Illustrator, ImageCompleter, PanelDirectory,
    StoryRecord, StoryRepository, UkiyoConfig, UkiyoResult, assembly,
};

/// Illustrate a stored story.
pub async fn illustrate(config: &UkiyoConfig, id: i32, out: &Path) -> UkiyoResult<()> {
    let repository = assembly::postgres_repository(config).await?;
    let record = repository.get_by_id(id).await?;
    let http = assembly::http_client(config)?;
    let images = Arc::new(assembly::image_gateway(config, &http));
    illustrate_record(&record, images, out).await
}

/// Render every block of `record` into `out`, skipping panels already there.
///
/// Panels rendered before a failure are still written.
pub async fn illustrate_record(
    record: &StoryRecord,
    images: Arc<dyn ImageCompleter>,
    out: &Path,
) -> UkiyoResult<()> {
    let blocks = record.fields.blocks();
    if blocks.is_empty() {
        warn!(story_id = record.id, "Story has no blocks to illustrate");
        return Ok(());
    }

    let panels = PanelDirectory::new(out);
    let cache = Arc::new(IllustrationCache::new());
    let addresses: Vec<_> = blocks.iter().map(|b| b.address).collect();
    panels.seed_cache(&addresses, &cache).await?;
    let on_disk: BTreeSet<_> = cache.snapshot().await.into_iter().map(|i| i.address).collect();

    let (tx, mut rx) = mpsc::channel::<IllustrationProgress>(16);
    let printer = tokio::spawn(async move {
        while let Some(step) = rx.recv().await {
            let source = if step.cached { "reused" } else { "rendered" };
            info!(address = %step.address, "{}/{} {source}", step.completed, step.total);
        }
    });

    let illustrator = Illustrator::new(images, Arc::clone(&cache));
    let result = illustrator.illustrate(&blocks, &tx).await;
    drop(tx);
    join_printer(printer).await;

    let mut written = 0;
    for illustration in cache.snapshot().await {
        if !on_disk.contains(&illustration.address) {
            panels.write(&illustration).await?;
            written += 1;
        }
    }

    let report = result?;
    println!(
        "Illustrated story #{}: {} new, {} reused, {} written to {}",
        record.id,
        report.rendered,
        report.reused,
        written,
        panels.root().display()
    );
    Ok(())
}

/// Wait for the progress printer, logging a panic instead of propagating it.
async fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Illustration progress printer failed");
            false
        }
    }
}
