//! Story generation command handler.

use super::{OutputFormat, illustrate, render};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use ukiyo::{
    GenerationSession, Progress, RunStatus, StoryRepository, UkiyoConfig, UkiyoResult, assembly,
};

fn report(event: &Progress) {
    match event {
        Progress::DialogueSkipped { .. } | Progress::Failed { .. } => {
            warn!(stage = %event.stage(), "{}", event.message())
        }
        _ => info!(stage = %event.stage(), "{}", event.message()),
    }
}

/// Generate a story, print it, and optionally illustrate it.
///
/// Ctrl-C aborts the run in flight.
pub async fn generate(
    config: &UkiyoConfig,
    prompt: &str,
    in_memory: bool,
    illustrate_into: Option<&Path>,
    format: OutputFormat,
) -> UkiyoResult<()> {
    let http = assembly::http_client(config)?;
    let repository = assembly::story_repository(config, in_memory).await?;
    let text = Arc::new(assembly::text_gateway(config, &http));
    let pipeline = assembly::story_pipeline(config, text, Arc::clone(&repository))?;
    let session = GenerationSession::new(Arc::new(pipeline));

    let mut run = session.start(prompt);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut interrupted = false;
    loop {
        tokio::select! {
            event = run.progress.recv() => match event {
                Some(event) => report(&event),
                None => break,
            },
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                warn!("Interrupted, cancelling generation");
                session.cancel();
            }
        }
    }
    let outcome = run.outcome().await?;

    if let RunStatus::DialogueLost { reason } = &outcome.status {
        warn!(story_id = outcome.story_id, %reason, "Story saved without dialogue");
    }

    let record = repository.get_by_id(outcome.story_id).await?;
    println!("{}", render::story(&record, format)?);

    if let Some(dir) = illustrate_into {
        let images = Arc::new(assembly::image_gateway(config, &http));
        illustrate::illustrate_record(&record, images, dir).await?;
    }
    Ok(())
}
