//! Provider identity.

use serde::{Deserialize, Serialize};

/// The LLM service that produced a piece of text.
///
/// The display form is what gets persisted with each story.
///
/// # Examples
///
/// ```
/// use ukiyo_core::ProviderId;
/// use std::str::FromStr;
///
/// assert_eq!(ProviderId::NovitaAi.to_string(), "Novita AI");
/// assert_eq!(ProviderId::from_str("Gemini").unwrap(), ProviderId::Gemini);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum ProviderId {
    /// Google Gemini, the primary text provider
    #[strum(serialize = "Gemini")]
    #[serde(rename = "Gemini")]
    Gemini,
    /// Novita AI, the fallback text provider and the image provider
    #[strum(serialize = "Novita AI")]
    #[serde(rename = "Novita AI")]
    NovitaAi,
}
