//! Progress reporting for a generation run.

use serde::Serialize;
use ukiyo_core::ProviderId;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Stage {
    /// Waiting for the plot outline
    PlotPending,
    /// Plot outline received
    PlotDone,
    /// Waiting for the full story
    StoryPending,
    /// Full story received
    StoryDone,
    /// Story and content blocks stored
    Persisted,
    /// Waiting for dialogue
    DialoguePending,
    /// Dialogue stored
    DialogueDone,
    /// Dialogue stage did not store anything
    DialogueSkipped,
    /// Run complete
    Finished,
    /// Run aborted
    Failed,
}

/// Why the dialogue stage stored nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DialogueSkip {
    /// The story has no blocks on even pages
    NoEvenPageBlocks,
    /// The reply contained no usable dialogue spans
    NothingExtracted,
    /// The dialogue request failed
    GatewayFailed(String),
    /// Storing the dialogue failed
    UpdateFailed(String),
}

/// One progress notification.
///
/// Each variant belongs to exactly one [`Stage`]; pending variants carry the
/// system prompt about to be sent and completed variants carry the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Progress {
    /// About to request the plot
    PlotPending {
        /// Plot system prompt
        system_prompt: String,
    },
    /// Plot received
    PlotDone {
        /// The plot outline
        plot: String,
        /// Provider that wrote it
        provider: ProviderId,
    },
    /// About to request the story
    StoryPending {
        /// Story system prompt
        system_prompt: String,
    },
    /// Story received
    StoryDone {
        /// The story text
        story: String,
        /// Provider that wrote it
        provider: ProviderId,
    },
    /// Story stored
    Persisted {
        /// Repository id
        story_id: i32,
        /// Number of content blocks stored
        block_count: usize,
    },
    /// About to request dialogue
    DialoguePending {
        /// Dialogue system prompt
        system_prompt: String,
        /// Number of blocks dialogue was requested for
        block_count: usize,
    },
    /// Dialogue stored
    DialogueDone {
        /// Number of dialogue fields stored
        dialogue_count: usize,
    },
    /// Dialogue stage stored nothing
    DialogueSkipped {
        /// Why
        reason: DialogueSkip,
    },
    /// Run complete
    Finished {
        /// Repository id
        story_id: i32,
        /// How complete the result is
        status: RunStatus,
    },
    /// Run aborted
    Failed {
        /// Stage that was in progress
        stage: Stage,
        /// Error description
        message: String,
    },
}

impl Progress {
    /// The stage this event reports.
    pub fn stage(&self) -> Stage {
        match self {
            Progress::PlotPending { .. } => Stage::PlotPending,
            Progress::PlotDone { .. } => Stage::PlotDone,
            Progress::StoryPending { .. } => Stage::StoryPending,
            Progress::StoryDone { .. } => Stage::StoryDone,
            Progress::Persisted { .. } => Stage::Persisted,
            Progress::DialoguePending { .. } => Stage::DialoguePending,
            Progress::DialogueDone { .. } => Stage::DialogueDone,
            Progress::DialogueSkipped { .. } => Stage::DialogueSkipped,
            Progress::Finished { .. } => Stage::Finished,
            Progress::Failed { .. } => Stage::Failed,
        }
    }

    /// Short human-readable status line.
    pub fn message(&self) -> String {
        match self {
            Progress::PlotPending { .. } => "Создание сюжета истории...".to_string(),
            Progress::PlotDone { .. } => "Сюжет создан.".to_string(),
            Progress::StoryPending { .. } => "Написание детальной истории по сюжету...".to_string(),
            Progress::StoryDone { .. } => "История сгенерирована!".to_string(),
            Progress::Persisted { story_id, block_count } => {
                format!("История сохранена (id {story_id}, блоков: {block_count}).")
            }
            Progress::DialoguePending { block_count, .. } => {
                format!("Создание диалогов для {block_count} блоков...")
            }
            Progress::DialogueDone { dialogue_count } => {
                format!("Диалоги сохранены ({dialogue_count}).")
            }
            Progress::DialogueSkipped { reason } => match reason {
                DialogueSkip::NoEvenPageBlocks => {
                    "Диалоги не нужны: нет чётных страниц.".to_string()
                }
                DialogueSkip::NothingExtracted => "Диалоги не найдены в ответе.".to_string(),
                DialogueSkip::GatewayFailed(e) => format!("Не удалось создать диалоги: {e}"),
                DialogueSkip::UpdateFailed(e) => format!("Не удалось сохранить диалоги: {e}"),
            },
            Progress::Finished { .. } => "Готово.".to_string(),
            Progress::Failed { message, .. } => format!("Ошибка: {message}"),
        }
    }
}

/// How complete a finished run is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Story and dialogue stored
    Complete,
    /// Story stored; there was no dialogue to store
    NoDialogue,
    /// Story stored; dialogue was lost to a failure
    DialogueLost {
        /// What went wrong
        reason: String,
    },
}

impl RunStatus {
    /// Whether anything the run attempted was lost.
    pub fn is_partial(&self) -> bool {
        matches!(self, RunStatus::DialogueLost { .. })
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// Repository id of the story
    pub story_id: i32,
    /// Provider that wrote the story
    pub provider: ProviderId,
    /// How complete the result is
    pub status: RunStatus,
}
