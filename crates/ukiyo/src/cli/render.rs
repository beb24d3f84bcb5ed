//! Text rendering of stories for the terminal.

use super::OutputFormat;
use ukiyo::{
    ConfigError, DisplayPage, StoryRecord, StorySummary, UkiyoResult, reconstruct_for_display,
};

fn to_json<T: serde::Serialize>(value: &T) -> UkiyoResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ConfigError::new(format!("Failed to serialize output: {e}")).into())
}

/// Pages as plain text, dialogue quoted under each block.
pub fn pages_text(pages: &[DisplayPage]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!("=== {} ===\n\n", page.label));
        for block in &page.blocks {
            out.push_str(&format!("--- {} ---\n{}\n", block.label, block.content));
            if let Some(dialogue) = &block.dialogue {
                for line in dialogue.lines() {
                    out.push_str(&format!("  > {line}\n"));
                }
            }
            out.push('\n');
        }
    }
    out
}

/// A whole story in the requested format.
pub fn story(record: &StoryRecord, format: OutputFormat) -> UkiyoResult<String> {
    match format {
        OutputFormat::Json => to_json(record),
        OutputFormat::Human => Ok(format!(
            "Story #{} ({}, {})\nPrompt: {}\n\n{}",
            record.id,
            record.provider,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.user_prompt,
            pages_text(&reconstruct_for_display(record))
        )),
    }
}

/// Story listing in the requested format.
pub fn summaries(stories: &[StorySummary], format: OutputFormat) -> UkiyoResult<String> {
    match format {
        OutputFormat::Json => to_json(&stories),
        OutputFormat::Human if stories.is_empty() => Ok("No stories yet.".to_string()),
        OutputFormat::Human => Ok(stories
            .iter()
            .map(|s| {
                let prompt: String = s.user_prompt.chars().take(60).collect();
                format!("{:>6}  {}  {}", s.id, s.created_at.format("%Y-%m-%d %H:%M"), prompt)
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
