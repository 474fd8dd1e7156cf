//! Emotion and free-form prompt conditioning
//!
//! The model reads bracketed text as a stage direction: it shapes the
//! delivery but is not spoken.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// Neutral sentinel; falls through to the custom prompt
    #[serde(rename = "None/Custom")]
    NoneCustom,
    Happy,
    Sad,
    Angry,
    Disgusted,
    Arrogant,
}

impl Emotion {
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::NoneCustom => "None/Custom",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Disgusted => "Disgusted",
            Emotion::Arrogant => "Arrogant",
        }
    }

    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::NoneCustom,
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Angry,
            Emotion::Disgusted,
            Emotion::Arrogant,
        ]
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::NoneCustom
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none/custom" | "none" | "custom" => Ok(Emotion::NoneCustom),
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" => Ok(Emotion::Angry),
            "disgusted" => Ok(Emotion::Disgusted),
            "arrogant" => Ok(Emotion::Arrogant),
            _ => Err(format!("Unknown emotion: {}", s)),
        }
    }
}

/// Prefix `text` with the stage direction picked by the user.
///
/// A non-neutral emotion wins over the custom prompt; a blank prompt with the
/// neutral emotion leaves the text as is.
pub fn apply_prompt(text: &str, emotion: Emotion, custom_prompt: &str) -> String {
    if emotion != Emotion::NoneCustom {
        format!("[I am really {},] {}", emotion.label().to_lowercase(), text)
    } else if !custom_prompt.trim().is_empty() {
        format!("[{},] {}", custom_prompt, text)
    } else {
        text.to_string()
    }
}
