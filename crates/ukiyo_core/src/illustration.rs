//! Generated panel images.

use crate::BlockAddress;
use serde::Serialize;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A rendered panel for one block, held as a `data:` URI.
///
/// # Examples
///
/// ```
/// use ukiyo_core::{BlockAddress, Illustration};
///
/// let art = Illustration::from_base64_png(BlockAddress::new(1, 2), "iVBORw0KGgo=");
/// assert_eq!(art.data_uri, "data:image/png;base64,iVBORw0KGgo=");
/// assert_eq!(art.base64_payload(), Some("iVBORw0KGgo="));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Illustration {
    /// Block the image belongs to
    pub address: BlockAddress,
    /// `data:image/png;base64,...`
    pub data_uri: String,
}

impl Illustration {
    /// Wrap an existing data URI.
    pub fn new(address: BlockAddress, data_uri: impl Into<String>) -> Self {
        Self {
            address,
            data_uri: data_uri.into(),
        }
    }

    /// Wrap raw base64 PNG bytes as a data URI.
    pub fn from_base64_png(address: BlockAddress, base64: &str) -> Self {
        Self::new(address, Self::png_data_uri(base64))
    }

    /// `data:image/png;base64,{base64}`
    pub fn png_data_uri(base64: &str) -> String {
        format!("{PNG_DATA_URI_PREFIX}{base64}")
    }

    /// The base64 body of the data URI, if it is a base64 PNG URI.
    pub fn base64_payload(&self) -> Option<&str> {
        self.data_uri.strip_prefix(PNG_DATA_URI_PREFIX)
    }
}
