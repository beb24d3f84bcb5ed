//! Read-side view of a story, grouped into pages.

use serde::Serialize;

/// One block as shown to a reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBlock {
    /// Heading such as "Блок 2"
    pub label: String,
    /// Block number, 0 for synthetic blocks
    pub number: u32,
    /// Narrative text
    pub content: String,
    /// Dialogue text if any was generated
    pub dialogue: Option<String>,
}

/// One page as shown to a reader.
///
/// # Examples
///
/// ```
/// use ukiyo_core::{DisplayBlock, DisplayPage};
///
/// let page = DisplayPage {
///     label: "Страница 1".into(),
///     number: 1,
///     blocks: vec![
///         DisplayBlock { label: "Блок 1".into(), number: 1, content: "One.".into(), dialogue: None },
///         DisplayBlock { label: "Блок 2".into(), number: 2, content: "Two.".into(), dialogue: None },
///     ],
/// };
/// assert_eq!(page.narrative(), "One.\n\nTwo.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPage {
    /// Heading such as "Страница 3"
    pub label: String,
    /// Page number, 0 for a prologue or unstructured text
    pub number: u32,
    /// Blocks in reading order
    pub blocks: Vec<DisplayBlock>,
}

impl DisplayPage {
    /// Block narratives joined by blank lines.
    pub fn narrative(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
