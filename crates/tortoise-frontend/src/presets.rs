//! Quality presets understood by the speech model

use serde::{Deserialize, Serialize};

/// Named quality/speed tradeoff, passed through to the model untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    UltraFast,
    /// Default for every front-end
    Fast,
    Standard,
    HighQuality,
}

impl Preset {
    /// Get the string identifier for this preset
    pub fn identifier(&self) -> &'static str {
        match self {
            Preset::UltraFast => "ultra_fast",
            Preset::Fast => "fast",
            Preset::Standard => "standard",
            Preset::HighQuality => "high_quality",
        }
    }

    /// Get all presets, fastest first
    pub fn all() -> &'static [Preset] {
        &[
            Preset::UltraFast,
            Preset::Fast,
            Preset::Standard,
            Preset::HighQuality,
        ]
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Fast
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::all()
            .iter()
            .copied()
            .find(|p| p.identifier() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown preset: {}", s))
    }
}
