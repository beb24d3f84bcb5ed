//! Prompt templates for the three text stages.

use serde::{Deserialize, Serialize};
use ukiyo_core::{BlockAddress, StoryFields};
use ukiyo_error::{PipelineError, PipelineErrorKind, UkiyoResult};

/// User turn sent with the plot system prompt.
pub const PLOT_USER_PROMPT: &str = "Создай сюжет для запроса пользователя.";
/// User turn sent with the story system prompt.
pub const STORY_USER_PROMPT: &str =
    "Теперь напиши полную историю на основе сюжета, предоставленного в системных инструкциях.";
/// User turn sent with the dialogue system prompt.
pub const DIALOGUE_USER_PROMPT: &str =
    "Напиши реплики персонажей для блоков, перечисленных в системных инструкциях.";

/// Opening delimiter around the plot embedded in the story prompt.
pub const PLOT_BEGIN: &str = "--- НАЧАЛО СЮЖЕТА ---";
/// Closing delimiter around the plot embedded in the story prompt.
pub const PLOT_END: &str = "--- КОНЕЦ СЮЖЕТА ---";

/// Number of blocks on each page of a story.
///
/// The default is the nine-page, twenty-four-block manga layout.
///
/// # Examples
///
/// ```
/// use ukiyo_narrative::StoryLayout;
///
/// let layout = StoryLayout::default();
/// assert_eq!(layout.block_count(), 24);
/// assert!(layout.outline().starts_with("Страница 1, Блок 1\nСтраница 1, Блок 2\n"));
///
/// assert!(StoryLayout::new(vec![2, 0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoryLayout {
    /// Blocks per page, page 1 first
    blocks_per_page: Vec<u32>,
}

impl Default for StoryLayout {
    fn default() -> Self {
        Self {
            blocks_per_page: vec![3, 1, 2, 4, 6, 2, 3, 1, 2],
        }
    }
}

impl StoryLayout {
    /// Layout with the given block count per page. Every page needs at least one block.
    pub fn new(blocks_per_page: Vec<u32>) -> UkiyoResult<Self> {
        if blocks_per_page.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::InvalidLayout(
                "layout has no pages".to_string(),
            ))
            .into());
        }
        if let Some(page) = blocks_per_page.iter().position(|n| *n == 0) {
            return Err(PipelineError::new(PipelineErrorKind::InvalidLayout(format!(
                "page {} has no blocks",
                page + 1
            )))
            .into());
        }
        Ok(Self { blocks_per_page })
    }

    /// Every block address, in reading order.
    pub fn addresses(&self) -> Vec<BlockAddress> {
        self.blocks_per_page
            .iter()
            .zip(1u32..)
            .flat_map(|(&blocks, page)| {
                (1..=blocks).map(move |block| BlockAddress::new(page, block))
            })
            .collect()
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks_per_page.iter().map(|n| *n as usize).sum()
    }

    /// One `Страница N, Блок M` line per block.
    pub fn outline(&self) -> String {
        self.addresses()
            .iter()
            .map(|a| format!("Страница {}, Блок {}\n", a.page, a.block))
            .collect()
    }
}

/// System prompt for the plot stage.
pub fn plot_system_prompt(user_prompt: &str, layout: &StoryLayout) -> String {
    format!(
        "Ты — сценарист манги. Твоя задача — написать полный план сюжета на основе запроса пользователя. \
Ответ должен быть строго на русском языке.\n\
Для каждого блока в структуре предоставь подробное предложение, описывающее действия персонажа, \
его чувства или происходящие с ним события.\n\
Сюжет ДОЛЖЕН следовать этой точной структуре, где каждая строка представляет отдельный блок. \
Используй русские слова \"Страница\" и \"Блок\":\n\
{outline}\n\
Запрос пользователя: \"{user_prompt}\"",
        outline = layout.outline(),
        user_prompt = user_prompt.trim(),
    )
}

/// System prompt for the story stage. The plot is embedded verbatim.
pub fn story_system_prompt(plot: &str) -> String {
    format!(
        "Ты — мастер манга-историй. Твоя задача — превратить данный сюжет в полную, подробную и яркую историю.\n\
История должна быть строго на русском языке и объемом примерно 3000 символов.\n\
Сосредоточься на:\n\
- **Подробных описаниях:** Опиши действия персонажей, их эмоции и внутренние мысли.\n\
- **Образном языке:** Используй язык, который легко превратить в кадры манги.\n\
- **Темпе повествования:** Правильно выстраивай напряжение от страницы к странице.\n\
Ты ДОЛЖЕН точно следовать предоставленному плану сюжета. Сохраняй структуру \"Страница X, Блок Y\" в своем ответе. \
Содержание каждого блока должно следовать сразу за строкой с его номером.\n\
Результат должен быть единым, непрерывным текстом.\n\n\
Вот сюжет, которому ты должен следовать:\n\
{PLOT_BEGIN}\n\
{plot}\n\
{PLOT_END}\n"
    )
}

/// System prompt for the dialogue stage, listing the blocks that need lines.
///
/// Each reply must be wrapped in `<start_pN_bM>` and `<end_pN_bM>` tags.
pub fn dialogue_system_prompt(blocks: &StoryFields) -> String {
    let listing = blocks
        .blocks()
        .iter()
        .map(|b| {
            format!(
                "[{}] Страница {}, Блок {}\n{}",
                b.address, b.address.page, b.address.block, b.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let example = blocks
        .content_addresses()
        .first()
        .copied()
        .unwrap_or(BlockAddress::new(2, 1));

    format!(
        "Ты — автор диалогов для манги. Для каждого блока ниже напиши короткие реплики персонажей \
(одна-три реплики), которые поместятся в облачках на кадре. Пиши строго на русском языке.\n\
Оберни реплики каждого блока в теги с его идентификатором, например:\n\
<start_{example}>\n— Реплика персонажа.\n<end_{example}>\n\
Не добавляй текст вне тегов и не пропускай блоки.\n\n\
Блоки:\n\
{listing}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_prompt_keeps_plot_verbatim_between_delimiters() {
        let plot = "Страница 1, Блок 1\nГерой просыпается.";
        let prompt = story_system_prompt(plot);
        let begin = prompt.find(PLOT_BEGIN).unwrap() + PLOT_BEGIN.len();
        let end = prompt.find(PLOT_END).unwrap();
        assert_eq!(prompt[begin..end].trim(), plot);
    }

    #[test]
    fn plot_prompt_lists_every_block_and_the_request() {
        let prompt = plot_system_prompt("  Кот-детектив  ", &StoryLayout::default());
        assert!(prompt.contains("Страница 5, Блок 6"));
        assert!(prompt.contains("Страница 9, Блок 2"));
        assert!(!prompt.contains("Страница 9, Блок 3"));
        assert!(prompt.contains("Запрос пользователя: \"Кот-детектив\""));
    }

    #[test]
    fn dialogue_prompt_uses_tags_of_listed_blocks() {
        let mut fields = StoryFields::new();
        fields.insert_content(BlockAddress::new(4, 2), "Погоня по крышам.");
        let prompt = dialogue_system_prompt(&fields);
        assert!(prompt.contains("<start_p4_b2>"));
        assert!(prompt.contains("<end_p4_b2>"));
        assert!(prompt.contains("[p4_b2] Страница 4, Блок 2\nПогоня по крышам."));
    }
}
