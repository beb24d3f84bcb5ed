//! Marker-based parsing of generated story text.
//!
//! Stories are written as a sequence of `Страница N, Блок M` (or
//! `Page N, Block M`) headings, each followed by that block's narrative.
//! Dialogue comes back wrapped in `<start_pN_bM>` / `<end_pN_bM>` tags.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;
use ukiyo_core::{BlockAddress, DisplayBlock, DisplayPage, StoryFields, StoryRecord};

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Страница|Page)\s*([0-9]+)[,.\s]+(?:Блок|Block)\s*([0-9]+)")
        .expect("Valid block marker regex")
});

static DIALOGUE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<start_p([0-9]+)_b([0-9]+)>").expect("Valid dialogue tag regex"));

/// Heading of the synthetic page holding text that precedes the first marker.
pub const PROLOGUE_PAGE_LABEL: &str = "Пролог";
/// Heading of the single block of the prologue page.
pub const PROLOGUE_BLOCK_LABEL: &str = "Вступление";
/// Heading used when a story has no markers at all.
pub const UNSTRUCTURED_PAGE_LABEL: &str = "История";
/// Block heading used when a story has no markers at all.
pub const UNSTRUCTURED_BLOCK_LABEL: &str = "Полный текст";

/// Text between one marker and the next.
struct Segment<'a> {
    address: Option<BlockAddress>,
    content: &'a str,
}

/// Split `text` into (text before the first marker, marker segments).
fn segments(text: &str) -> (&str, Vec<Segment<'_>>) {
    let markers: Vec<_> = MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let page = caps.get(1)?.as_str().parse::<u32>().ok().filter(|n| *n > 0);
            let block = caps.get(2)?.as_str().parse::<u32>().ok().filter(|n| *n > 0);
            let address = page.zip(block).map(|(p, b)| BlockAddress::new(p, b));
            Some((whole.start(), whole.end(), address))
        })
        .collect();

    let Some(&(first_start, _, _)) = markers.first() else {
        return (text, Vec::new());
    };

    let segments = markers
        .iter()
        .enumerate()
        .map(|(i, &(_, end, address))| {
            let stop = markers.get(i + 1).map_or(text.len(), |next| next.0);
            Segment {
                address,
                content: text[end..stop].trim(),
            }
        })
        .collect();

    (&text[..first_start], segments)
}

/// Pull per-block narrative out of marker-structured text.
///
/// Each marker starts a block that runs until the next marker. Content is
/// trimmed; blocks with no content are dropped, as is any text before the
/// first marker. When an address repeats, the later block wins.
///
/// # Examples
///
/// ```
/// use ukiyo_core::BlockAddress;
/// use ukiyo_narrative::extract_blocks;
///
/// let text = "Intro.\nСтраница 1, Блок 1\nA door opens.\nPage 1. Block 2\n\nRain.\nСтраница 2, Блок 1\n";
/// let fields = extract_blocks(text);
///
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields.content(BlockAddress::new(1, 1)), Some("A door opens."));
/// assert_eq!(fields.content(BlockAddress::new(1, 2)), Some("Rain."));
/// assert!(!fields.has_content(BlockAddress::new(2, 1)));
/// ```
pub fn extract_blocks(text: &str) -> StoryFields {
    let (_, segments) = segments(text);
    let mut fields = StoryFields::new();
    for segment in segments {
        let Some(address) = segment.address else {
            continue;
        };
        if segment.content.is_empty() {
            continue;
        }
        if fields.insert_content(address, segment.content).is_some() {
            debug!(block = %address, "Duplicate marker, keeping the later block");
        }
    }
    fields
}

/// Pull dialogue out of `<start_pN_bM>…<end_pN_bM>` spans.
///
/// The closing tag must carry the same address as the opening tag. Spans do
/// not nest; an opening tag without its closing tag is ignored. Content is
/// trimmed and empty spans are dropped.
///
/// # Examples
///
/// ```
/// use ukiyo_core::BlockAddress;
/// use ukiyo_narrative::extract_dialogue;
///
/// let text = "<start_p2_b1> \"Hold the line!\" <end_p2_b1>\n<start_p4_b1><end_p4_b1>";
/// let fields = extract_dialogue(text);
///
/// assert_eq!(fields.dialogue(BlockAddress::new(2, 1)), Some("\"Hold the line!\""));
/// assert_eq!(fields.len(), 1);
/// ```
pub fn extract_dialogue(text: &str) -> StoryFields {
    let mut fields = StoryFields::new();
    let mut cursor = 0;

    while let Some(caps) = DIALOGUE_START.captures_at(text, cursor) {
        let Some(open) = caps.get(0) else { break };
        let address = caps
            .get(1)
            .zip(caps.get(2))
            .and_then(|(p, b)| {
                Some((p.as_str().parse::<u32>().ok()?, b.as_str().parse::<u32>().ok()?))
            })
            .filter(|(p, b)| *p > 0 && *b > 0)
            .map(|(p, b)| BlockAddress::new(p, b));

        let Some(address) = address else {
            cursor = open.end();
            continue;
        };

        let closing = format!("<end_{address}>");
        match text[open.end()..].find(&closing) {
            Some(offset) => {
                let body = text[open.end()..open.end() + offset].trim();
                if !body.is_empty() {
                    fields.insert_dialogue(address, body);
                }
                cursor = open.end() + offset + closing.len();
            }
            None => {
                debug!(block = %address, "Dialogue tag without closing tag");
                cursor = open.end();
            }
        }
    }

    fields
}

/// Render content fields back into marker-structured text.
///
/// Blocks appear in reading order, each under a `Страница N, Блок M` heading.
/// Feeding the result to [`extract_blocks`] yields the same content fields.
pub fn render_blocks(fields: &StoryFields) -> String {
    fields
        .blocks()
        .iter()
        .map(|b| {
            format!(
                "Страница {}, Блок {}\n{}",
                b.address.page, b.address.block, b.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Group raw story text into pages for reading.
///
/// Pages are sorted by number, blocks keep the order they appear in. Text
/// before the first marker becomes a prologue page. Text without any marker
/// becomes a single page with a single block holding the whole text.
///
/// # Examples
///
/// ```
/// use ukiyo_narrative::parse_story_for_display;
///
/// let pages = parse_story_for_display("Just one long paragraph.");
/// assert_eq!(pages.len(), 1);
/// assert_eq!(pages[0].label, "История");
/// assert_eq!(pages[0].blocks[0].content, "Just one long paragraph.");
/// ```
pub fn parse_story_for_display(text: &str) -> Vec<DisplayPage> {
    let (prologue, segments) = segments(text);

    if segments.is_empty() {
        return vec![DisplayPage {
            label: UNSTRUCTURED_PAGE_LABEL.to_string(),
            number: 0,
            blocks: vec![DisplayBlock {
                label: UNSTRUCTURED_BLOCK_LABEL.to_string(),
                number: 0,
                content: text.trim().to_string(),
                dialogue: None,
            }],
        }];
    }

    let mut pages: BTreeMap<u32, Vec<DisplayBlock>> = BTreeMap::new();
    for segment in segments {
        let Some(address) = segment.address else {
            continue;
        };
        if segment.content.is_empty() {
            continue;
        }
        pages.entry(address.page).or_default().push(DisplayBlock {
            label: block_label(address.block),
            number: address.block,
            content: segment.content.to_string(),
            dialogue: None,
        });
    }

    let mut result = Vec::with_capacity(pages.len() + 1);
    let prologue = prologue.trim();
    if !prologue.is_empty() {
        result.push(DisplayPage {
            label: PROLOGUE_PAGE_LABEL.to_string(),
            number: 0,
            blocks: vec![DisplayBlock {
                label: PROLOGUE_BLOCK_LABEL.to_string(),
                number: 0,
                content: prologue.to_string(),
                dialogue: None,
            }],
        });
    }
    result.extend(pages.into_iter().map(|(number, blocks)| DisplayPage {
        label: page_label(number),
        number,
        blocks,
    }));
    result
}

/// Group stored block fields into pages.
///
/// Pages and blocks are ordered numerically; missing block numbers leave no
/// gap. Dialogue is attached only to blocks that have content.
pub fn pages_from_fields(fields: &StoryFields) -> Vec<DisplayPage> {
    let mut pages: BTreeMap<u32, Vec<DisplayBlock>> = BTreeMap::new();
    for block in fields.blocks() {
        if block.content.trim().is_empty() {
            continue;
        }
        pages.entry(block.address.page).or_default().push(DisplayBlock {
            label: block_label(block.address.block),
            number: block.address.block,
            content: block.content,
            dialogue: block.dialogue.filter(|d| !d.trim().is_empty()),
        });
    }

    pages
        .into_iter()
        .map(|(number, blocks)| DisplayPage {
            label: page_label(number),
            number,
            blocks,
        })
        .collect()
}

/// Pages for a stored story.
///
/// Uses the block fields when there are any, otherwise falls back to parsing
/// the raw story text.
pub fn reconstruct_for_display(record: &StoryRecord) -> Vec<DisplayPage> {
    let pages = pages_from_fields(&record.fields);
    if pages.is_empty() {
        debug!(story_id = record.id, "No block fields, parsing raw story text");
        return parse_story_for_display(&record.final_story_raw);
    }
    pages
}

/// The whole story as continuous text: every page narrative, in order.
pub fn story_prologue(pages: &[DisplayPage]) -> String {
    pages
        .iter()
        .map(DisplayPage::narrative)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn page_label(number: u32) -> String {
    format!("Страница {number}")
}

fn block_label(number: u32) -> String {
    format!("Блок {number}")
}
