//! One generation at a time: starting a new run aborts the previous one.

use crate::orchestrator::StoryPipeline;
use crate::progress::{Progress, RunOutcome};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info};
use ukiyo_error::{PipelineError, PipelineErrorKind, UkiyoResult};

/// Default progress channel capacity.
pub const PROGRESS_BUFFER: usize = 32;

/// Owns the currently running generation.
///
/// Only the most recent run is allowed to finish. Aborting drops the run's
/// future, which also drops any provider request it was awaiting.
#[derive(Debug)]
pub struct GenerationSession {
    pipeline: Arc<StoryPipeline>,
    current: Mutex<Option<AbortHandle>>,
}

impl GenerationSession {
    /// Session driving `pipeline`.
    pub fn new(pipeline: Arc<StoryPipeline>) -> Self {
        Self {
            pipeline,
            current: Mutex::new(None),
        }
    }

    /// Start a run for `prompt`, aborting any run still in flight.
    pub fn start(&self, prompt: impl Into<String>) -> GenerationRun {
        let prompt = prompt.into();
        let (tx, rx) = mpsc::channel(PROGRESS_BUFFER);
        let pipeline = Arc::clone(&self.pipeline);

        let handle = tokio::spawn(async move { pipeline.run(&prompt, &tx).await });

        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.replace(handle.abort_handle()) {
            if !previous.is_finished() {
                info!("Superseding generation still in flight");
            }
            previous.abort();
        }

        GenerationRun {
            progress: rx,
            handle,
        }
    }

    /// Abort the current run. Returns whether one was still running.
    pub fn cancel(&self) -> bool {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        match current.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                debug!(running, "Generation cancelled");
                running
            }
            None => false,
        }
    }
}

/// Handle to a started run.
#[derive(Debug)]
pub struct GenerationRun {
    /// Progress events, closed when the run ends or is aborted
    pub progress: mpsc::Receiver<Progress>,
    handle: JoinHandle<UkiyoResult<RunOutcome>>,
}

impl GenerationRun {
    /// Wait for the run to end.
    ///
    /// An aborted run yields [`PipelineErrorKind::Cancelled`].
    pub async fn outcome(self) -> UkiyoResult<RunOutcome> {
        drop(self.progress);
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                Err(PipelineError::new(PipelineErrorKind::Cancelled).into())
            }
            Err(e) => Err(PipelineError::new(PipelineErrorKind::TaskFailed(e.to_string())).into()),
        }
    }
}
