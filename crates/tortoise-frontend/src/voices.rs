//! Voice catalog offered by every front-end
//!
//! The named voices match the reference clips shipped with the model. Three
//! sentinels complete the list: [`VoiceOption::Random`] lets the model pick a
//! speaker, [`VoiceOption::CustomVoice`] uses audio the user recorded, and
//! [`VoiceOption::Disabled`] fills the optional secondary voice slots.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceOption {
    /// Angie - default voice
    Angie,
    CondLatentExample,
    Deniro,
    Freeman,
    Halle,
    Lj,
    Myself,
    Pat2,
    Snakes,
    Tom,
    TrainDaws,
    TrainDreams,
    TrainGrace,
    TrainLescault,
    Weaver,
    Applejack,
    Daniel,
    Emma,
    Geralt,
    Jlaw,
    Mol,
    Pat,
    Rainbow,
    TimReynolds,
    TrainAtkins,
    TrainDotrice,
    TrainEmpire,
    TrainKennard,
    TrainMouse,
    William,
    /// Let the model draw a random speaker
    Random,
    /// Condition on a clip supplied with the request
    CustomVoice,
    /// Empty secondary voice slot
    Disabled,
}

impl VoiceOption {
    /// Get the string identifier for this voice
    pub fn identifier(&self) -> &'static str {
        match self {
            VoiceOption::Angie => "angie",
            VoiceOption::CondLatentExample => "cond_latent_example",
            VoiceOption::Deniro => "deniro",
            VoiceOption::Freeman => "freeman",
            VoiceOption::Halle => "halle",
            VoiceOption::Lj => "lj",
            VoiceOption::Myself => "myself",
            VoiceOption::Pat2 => "pat2",
            VoiceOption::Snakes => "snakes",
            VoiceOption::Tom => "tom",
            VoiceOption::TrainDaws => "train_daws",
            VoiceOption::TrainDreams => "train_dreams",
            VoiceOption::TrainGrace => "train_grace",
            VoiceOption::TrainLescault => "train_lescault",
            VoiceOption::Weaver => "weaver",
            VoiceOption::Applejack => "applejack",
            VoiceOption::Daniel => "daniel",
            VoiceOption::Emma => "emma",
            VoiceOption::Geralt => "geralt",
            VoiceOption::Jlaw => "jlaw",
            VoiceOption::Mol => "mol",
            VoiceOption::Pat => "pat",
            VoiceOption::Rainbow => "rainbow",
            VoiceOption::TimReynolds => "tim_reynolds",
            VoiceOption::TrainAtkins => "train_atkins",
            VoiceOption::TrainDotrice => "train_dotrice",
            VoiceOption::TrainEmpire => "train_empire",
            VoiceOption::TrainKennard => "train_kennard",
            VoiceOption::TrainMouse => "train_mouse",
            VoiceOption::William => "william",
            VoiceOption::Random => "random",
            VoiceOption::CustomVoice => "custom_voice",
            VoiceOption::Disabled => "disabled",
        }
    }

    /// Every option in the order the dropdowns list them
    pub fn all() -> &'static [VoiceOption] {
        &[
            VoiceOption::Angie,
            VoiceOption::CondLatentExample,
            VoiceOption::Deniro,
            VoiceOption::Freeman,
            VoiceOption::Halle,
            VoiceOption::Lj,
            VoiceOption::Myself,
            VoiceOption::Pat2,
            VoiceOption::Snakes,
            VoiceOption::Tom,
            VoiceOption::TrainDaws,
            VoiceOption::TrainDreams,
            VoiceOption::TrainGrace,
            VoiceOption::TrainLescault,
            VoiceOption::Weaver,
            VoiceOption::Applejack,
            VoiceOption::Daniel,
            VoiceOption::Emma,
            VoiceOption::Geralt,
            VoiceOption::Jlaw,
            VoiceOption::Mol,
            VoiceOption::Pat,
            VoiceOption::Rainbow,
            VoiceOption::TimReynolds,
            VoiceOption::TrainAtkins,
            VoiceOption::TrainDotrice,
            VoiceOption::TrainEmpire,
            VoiceOption::TrainKennard,
            VoiceOption::TrainMouse,
            VoiceOption::William,
            VoiceOption::Random,
            VoiceOption::CustomVoice,
            VoiceOption::Disabled,
        ]
    }

    /// Options backed by reference clips on disk, i.e. everything but the sentinels.
    pub fn named() -> impl Iterator<Item = VoiceOption> {
        Self::all().iter().copied().filter(|v| !v.is_sentinel())
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            VoiceOption::Random | VoiceOption::CustomVoice | VoiceOption::Disabled
        )
    }
}

impl Default for VoiceOption {
    fn default() -> Self {
        VoiceOption::Angie
    }
}

impl std::fmt::Display for VoiceOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl std::str::FromStr for VoiceOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        VoiceOption::all()
            .iter()
            .copied()
            .find(|v| v.identifier() == wanted)
            .ok_or_else(|| format!("Unknown voice: {}", s))
    }
}

/// Build the ordered list of voices to load for one request.
///
/// `custom_voice` as the primary voice is left out, since its audio travels
/// with the request instead of coming from the store. Secondary slots set to
/// `disabled` are skipped and repeats are dropped.
pub fn assemble_voices(
    primary: VoiceOption,
    voice_b: VoiceOption,
    voice_c: VoiceOption,
) -> Vec<VoiceOption> {
    let mut voices = Vec::with_capacity(3);
    if primary != VoiceOption::CustomVoice {
        voices.push(primary);
    }
    for extra in [voice_b, voice_c] {
        if extra != VoiceOption::Disabled && !voices.contains(&extra) {
            voices.push(extra);
        }
    }
    voices
}

/// Comma separated identifiers, as written to the run log.
pub fn join_identifiers(voices: &[VoiceOption]) -> String {
    voices
        .iter()
        .map(VoiceOption::identifier)
        .collect::<Vec<_>>()
        .join(",")
}
