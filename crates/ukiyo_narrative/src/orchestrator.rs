//! The generation pipeline: plot, story, persist, dialogue.

use crate::markers::{extract_blocks, extract_dialogue};
use crate::progress::{DialogueSkip, Progress, RunOutcome, RunStatus, Stage};
use crate::prompts::{
    DIALOGUE_USER_PROMPT, PLOT_USER_PROMPT, STORY_USER_PROMPT, StoryLayout, dialogue_system_prompt,
    plot_system_prompt, story_system_prompt,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use ukiyo_core::{NewStory, StoryFields};
use ukiyo_error::{PipelineError, PipelineErrorKind, UkiyoError, UkiyoResult};
use ukiyo_interface::{StoryRepository, TextCompleter};

/// Drives one story from prompt to stored record.
///
/// Stages run strictly in order. A failure while producing the plot, the
/// story, or the stored record ends the run with an error. Dialogue is best
/// effort: its failures are reported through [`RunStatus`] and progress
/// events, never as an error.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tokio::sync::mpsc;
/// use ukiyo_interface::{StoryRepository, TextCompleter};
/// use ukiyo_narrative::{Progress, StoryPipeline};
///
/// # async fn example(
/// #     text: Arc<dyn TextCompleter>,
/// #     repository: Arc<dyn StoryRepository>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = StoryPipeline::new(text, repository);
/// let (tx, mut rx) = mpsc::channel::<Progress>(32);
///
/// let printer = tokio::spawn(async move {
///     while let Some(event) = rx.recv().await {
///         println!("{}", event.message());
///     }
/// });
///
/// let outcome = pipeline.run("A ronin guards a lighthouse", &tx).await?;
/// drop(tx);
/// printer.await?;
/// println!("story {} ({:?})", outcome.story_id, outcome.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StoryPipeline {
    text: Arc<dyn TextCompleter>,
    repository: Arc<dyn StoryRepository>,
    layout: StoryLayout,
}

impl std::fmt::Debug for StoryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryPipeline")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl StoryPipeline {
    /// Pipeline with the default page layout.
    pub fn new(text: Arc<dyn TextCompleter>, repository: Arc<dyn StoryRepository>) -> Self {
        Self {
            text,
            repository,
            layout: StoryLayout::default(),
        }
    }

    /// Use a different page layout for the plot.
    pub fn with_layout(mut self, layout: StoryLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Run every stage for `user_prompt`, reporting progress on `progress`.
    ///
    /// A closed progress channel does not stop the run.
    #[instrument(skip_all, fields(prompt_chars = user_prompt.len()))]
    pub async fn run(
        &self,
        user_prompt: &str,
        progress: &mpsc::Sender<Progress>,
    ) -> UkiyoResult<RunOutcome> {
        let user_prompt = user_prompt.trim();
        if user_prompt.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::EmptyPrompt).into());
        }

        // Plot
        let plot_system = plot_system_prompt(user_prompt, &self.layout);
        emit(progress, Progress::PlotPending {
            system_prompt: plot_system.clone(),
        })
        .await;
        let plot = match self.text.complete(&plot_system, PLOT_USER_PROMPT).await {
            Ok(plot) => plot,
            Err(e) => return Err(fail(progress, Stage::PlotPending, e).await),
        };
        info!(provider = %plot.provider, chars = plot.text.len(), "Plot created");
        emit(progress, Progress::PlotDone {
            plot: plot.text.clone(),
            provider: plot.provider,
        })
        .await;

        // Story
        let story_system = story_system_prompt(&plot.text);
        emit(progress, Progress::StoryPending {
            system_prompt: story_system.clone(),
        })
        .await;
        let story = match self.text.complete(&story_system, STORY_USER_PROMPT).await {
            Ok(story) => story,
            Err(e) => return Err(fail(progress, Stage::StoryPending, e).await),
        };
        info!(provider = %story.provider, chars = story.text.len(), "Story written");
        emit(progress, Progress::StoryDone {
            story: story.text.clone(),
            provider: story.provider,
        })
        .await;

        // Persist
        let fields = extract_blocks(&story.text);
        let block_count = fields.len();
        if block_count == 0 {
            warn!("Story contains no block markers; storing raw text only");
        }
        let new_story = NewStory {
            user_prompt: user_prompt.to_string(),
            plot_system_prompt: plot_system,
            story_system_prompt: story_system,
            final_story_raw: story.text.clone(),
            provider: story.provider,
            fields: fields.clone(),
        };
        let story_id = match self.repository.insert(&new_story).await {
            Ok(id) => id,
            Err(e) => return Err(fail(progress, Stage::Persisted, e).await),
        };
        info!(story_id, block_count, "Story persisted");
        emit(progress, Progress::Persisted {
            story_id,
            block_count,
        })
        .await;

        // Dialogue
        let status = self.dialogue(story_id, &fields, progress).await;
        emit(progress, Progress::Finished {
            story_id,
            status: status.clone(),
        })
        .await;

        Ok(RunOutcome {
            story_id,
            provider: story.provider,
            status,
        })
    }

    async fn dialogue(
        &self,
        story_id: i32,
        fields: &StoryFields,
        progress: &mpsc::Sender<Progress>,
    ) -> RunStatus {
        let mut even_pages = fields.clone();
        even_pages.retain(|key, _| key.address.is_even_page());

        if even_pages.is_empty() {
            debug!(story_id, "No even-page blocks, skipping dialogue");
            emit(progress, Progress::DialogueSkipped {
                reason: DialogueSkip::NoEvenPageBlocks,
            })
            .await;
            return RunStatus::NoDialogue;
        }

        let system_prompt = dialogue_system_prompt(&even_pages);
        emit(progress, Progress::DialoguePending {
            system_prompt: system_prompt.clone(),
            block_count: even_pages.len(),
        })
        .await;

        let reply = match self.text.complete(&system_prompt, DIALOGUE_USER_PROMPT).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    story_id,
                    error = %e,
                    "Dialogue generation failed; story kept without dialogue"
                );
                return lost(progress, DialogueSkip::GatewayFailed(e.to_string())).await;
            }
        };

        let mut dialogue = extract_dialogue(&reply.text);
        dialogue.retain(|key, _| {
            let requested = even_pages.has_content(key.address);
            if !requested {
                warn!(
                    story_id,
                    field = %key,
                    "Dropping dialogue for a block that was not requested"
                );
            }
            requested
        });

        if dialogue.is_empty() {
            warn!(story_id, "Dialogue reply had no usable spans");
            return lost(progress, DialogueSkip::NothingExtracted).await;
        }

        match self.repository.update(story_id, &dialogue).await {
            Ok(()) => {
                info!(story_id, dialogue_count = dialogue.len(), "Dialogue persisted");
                emit(progress, Progress::DialogueDone {
                    dialogue_count: dialogue.len(),
                })
                .await;
                RunStatus::Complete
            }
            Err(e) => {
                warn!(story_id, error = %e, "Dialogue update failed; story kept without dialogue");
                lost(progress, DialogueSkip::UpdateFailed(e.to_string())).await
            }
        }
    }
}

async fn emit(progress: &mpsc::Sender<Progress>, event: Progress) {
    debug!(stage = %event.stage(), "Progress");
    if progress.send(event).await.is_err() {
        debug!("Progress receiver dropped");
    }
}

async fn fail(progress: &mpsc::Sender<Progress>, stage: Stage, err: UkiyoError) -> UkiyoError {
    error!(stage = %stage, error = %err, "Generation failed");
    emit(progress, Progress::Failed {
        stage,
        message: err.to_string(),
    })
    .await;
    err
}

async fn lost(progress: &mpsc::Sender<Progress>, reason: DialogueSkip) -> RunStatus {
    let message = match &reason {
        DialogueSkip::GatewayFailed(e) | DialogueSkip::UpdateFailed(e) => e.clone(),
        DialogueSkip::NothingExtracted => "reply contained no dialogue spans".to_string(),
        DialogueSkip::NoEvenPageBlocks => "no even-page blocks".to_string(),
    };
    emit(progress, Progress::DialogueSkipped { reason }).await;
    RunStatus::DialogueLost { reason: message }
}
