//! Prompt text for manga panel rendering.

/// Negative prompt sent with every panel.
///
/// Always excludes minors from panels.
pub const PANEL_NEGATIVE_PROMPT: &str = "(worst quality, low quality, normal quality), color, 3d, photo, realistic, ugly, deformed, text, watermark, signature, blurry, jpeg artifacts, child, loli, artist name";

const PANEL_STYLE: &str = "masterpiece, best quality, highly detailed manga page panel, intense dramatic scene, traditional ink drawing style, monochromatic with selective color accents, vivid crimson red, deep black ink, rough sketch lines, G-pen texture, analog feel, heavy screentones, cross-hatching shading, high contrast lighting, noir atmosphere";

const PANEL_DETAILS: &str = "expressive faces, motion blur effects, Japanese sound effect text (SFX), rough paper texture border";

const PANEL_REFERENCES: &str = "detailed line work, raw and gritty, cinematic angle, dynamic composition, sharp focus, 8k resolution";

/// Wrap a block's narrative in the fixed panel style.
///
/// # Examples
///
/// ```
/// use ukiyo_models::panel_prompt;
///
/// let prompt = panel_prompt("a courier runs across a rooftop");
/// assert!(prompt.starts_with("masterpiece"));
/// assert!(prompt.contains("SUBJECT: a courier runs across a rooftop."));
/// ```
pub fn panel_prompt(scene_description: &str) -> String {
    format!(
        "{PANEL_STYLE}. SUBJECT: {}. DETAILS: {PANEL_DETAILS}. \
         STYLISTIC REFERENCES: {PANEL_REFERENCES}.",
        scene_description.trim()
    )
}
