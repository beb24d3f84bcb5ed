//! Block addresses and the dynamic field names derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a narrative block: page `page`, block `block`, both 1-based.
///
/// Ordering is by page, then block, which is the natural reading order.
///
/// # Examples
///
/// ```
/// use ukiyo_core::BlockAddress;
///
/// let addr = BlockAddress::new(2, 3);
/// assert_eq!(addr.content_key(), "p2_b3");
/// assert_eq!(addr.dialogue_key(), "p2_b3_dialogue");
/// assert!(addr.is_even_page());
/// assert!(BlockAddress::new(1, 9) < BlockAddress::new(2, 1));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockAddress {
    /// Page number (1-based)
    pub page: u32,
    /// Block number within the page (1-based)
    pub block: u32,
}

impl BlockAddress {
    /// Create an address.
    pub fn new(page: u32, block: u32) -> Self {
        Self { page, block }
    }

    /// Field name holding this block's narrative.
    pub fn content_key(&self) -> String {
        FieldKey::content(*self).to_string()
    }

    /// Field name holding this block's dialogue.
    pub fn dialogue_key(&self) -> String {
        FieldKey::dialogue(*self).to_string()
    }

    /// Dialogue is only generated for blocks on even pages.
    pub fn is_even_page(&self) -> bool {
        self.page % 2 == 0
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}_b{}", self.page, self.block)
    }
}

/// What a dynamic field stores for its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKind {
    /// Narrative text (`pN_bM`)
    Content,
    /// Dialogue text (`pN_bM_dialogue`)
    Dialogue,
}

/// A parsed dynamic field name.
///
/// # Examples
///
/// ```
/// use ukiyo_core::{BlockAddress, FieldKey, FieldKind};
///
/// let key = FieldKey::parse("p4_b2_dialogue").unwrap();
/// assert_eq!(key.address, BlockAddress::new(4, 2));
/// assert_eq!(key.kind, FieldKind::Dialogue);
///
/// assert!(FieldKey::parse("user_prompt").is_none());
/// assert!(FieldKey::parse("p0_b1").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    /// Block the field belongs to
    pub address: BlockAddress,
    /// Content or dialogue
    pub kind: FieldKind,
}

impl FieldKey {
    /// Key for a block's narrative.
    pub fn content(address: BlockAddress) -> Self {
        Self {
            address,
            kind: FieldKind::Content,
        }
    }

    /// Key for a block's dialogue.
    pub fn dialogue(address: BlockAddress) -> Self {
        Self {
            address,
            kind: FieldKind::Dialogue,
        }
    }

    /// Parse `pN_bM` or `pN_bM_dialogue`. Page and block must be positive.
    pub fn parse(name: &str) -> Option<Self> {
        let (body, kind) = match name.strip_suffix("_dialogue") {
            Some(body) => (body, FieldKind::Dialogue),
            None => (name, FieldKind::Content),
        };
        let (page, block) = body.strip_prefix('p')?.split_once("_b")?;
        let page = parse_positive(page)?;
        let block = parse_positive(block)?;
        Some(Self {
            address: BlockAddress::new(page, block),
            kind,
        })
    }
}

fn parse_positive(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldKind::Content => write!(f, "{}", self.address),
            FieldKind::Dialogue => write!(f, "{}_dialogue", self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for name in ["p1_b1", "p12_b30", "p2_b1_dialogue"] {
            let key = FieldKey::parse(name).expect("valid field name");
            assert_eq!(key.to_string(), name);
        }
    }

    #[test]
    fn parse_rejects_malformed_names() {
        for name in ["", "p_b1", "p1_b", "p1b1", "p-1_b2", "p1_b2_dialog", "q1_b1", "p1_b+2"] {
            assert!(FieldKey::parse(name).is_none(), "{name} should not parse");
        }
    }

    #[test]
    fn content_sorts_before_dialogue_for_same_block() {
        let addr = BlockAddress::new(3, 1);
        assert!(FieldKey::content(addr) < FieldKey::dialogue(addr));
    }
}
