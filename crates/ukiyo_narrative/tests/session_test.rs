//! Tests for run supersession and cancellation.

mod test_utils;

use std::sync::Arc;
use test_utils::{ONE_PAGE_STORY, Reply, ScriptedCompleter, text};
use ukiyo_error::{PipelineErrorKind, UkiyoErrorKind};
use ukiyo_interface::StoryRepository;
use ukiyo_narrative::{GenerationSession, InMemoryStoryRepository, Stage, StoryPipeline};

fn is_cancelled(err: &ukiyo_error::UkiyoError) -> bool {
    matches!(err.kind(), UkiyoErrorKind::Pipeline(e) if e.kind == PipelineErrorKind::Cancelled)
}

#[tokio::test]
async fn test_new_run_supersedes_previous() -> anyhow::Result<()> {
    // First run hangs on its plot; the second gets the remaining script.
    let text_gateway =
        ScriptedCompleter::new(vec![Reply::Hang, text("plot"), text(ONE_PAGE_STORY)]);
    let repo = Arc::new(InMemoryStoryRepository::new());
    let pipeline = StoryPipeline::new(Arc::new(text_gateway.clone()), repo.clone());
    let session = GenerationSession::new(Arc::new(pipeline));

    let mut first = session.start("first");
    let pending = first.progress.recv().await;
    assert_eq!(pending.map(|e| e.stage()), Some(Stage::PlotPending));

    let mut second = session.start("second");
    let mut stages = Vec::new();
    while let Some(event) = second.progress.recv().await {
        stages.push(event.stage());
    }

    let first_result = first.outcome().await;
    assert!(is_cancelled(&first_result.unwrap_err()));

    let outcome = second.outcome().await?;
    assert_eq!(stages.last(), Some(&Stage::Finished));
    assert_eq!(repo.len().await, 1);
    assert_eq!(repo.get_by_id(outcome.story_id).await?.user_prompt, "second");
    Ok(())
}

#[tokio::test]
async fn test_cancel_aborts_running_generation() {
    let text_gateway = ScriptedCompleter::new(vec![Reply::Hang]);
    let repo = Arc::new(InMemoryStoryRepository::new());
    let pipeline = StoryPipeline::new(Arc::new(text_gateway), repo.clone());
    let session = GenerationSession::new(Arc::new(pipeline));

    let mut run = session.start("prompt");
    let _ = run.progress.recv().await;

    assert!(session.cancel());
    assert!(!session.cancel());

    let result = run.outcome().await;
    assert!(is_cancelled(&result.unwrap_err()));
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_cancel_after_completion_reports_nothing_running() -> anyhow::Result<()> {
    let text_gateway = ScriptedCompleter::new(vec![text("plot"), text(ONE_PAGE_STORY)]);
    let pipeline = StoryPipeline::new(
        Arc::new(text_gateway),
        Arc::new(InMemoryStoryRepository::new()),
    );
    let session = GenerationSession::new(Arc::new(pipeline));

    let run = session.start("prompt");
    run.outcome().await?;

    assert!(!session.cancel());
    Ok(())
}
