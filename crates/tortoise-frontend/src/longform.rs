//! Long-form narration: split a script into passages, synthesize each one,
//! and stitch the results together.
//!
//! Every passage is saved as `<longform_dir>/<name>/<n>.wav` (1-based), the
//! combined narration as `<output_dir>/<name>.wav`. A later run with a
//! regenerate list only resynthesizes the listed passages and reuses the
//! saved files for the rest.

use crate::audio::{load_audio, write_wav};
use crate::error::{FrontendError, FrontendResult};
use crate::presets::Preset;
use crate::session::{SpeechSession, require_secondary_voices, require_stock_voice};
use crate::text::{SplitMode, split_passages};
use crate::types::{AudioData, SynthesisRequest};
use crate::voices::{VoiceOption, assemble_voices};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct LongformRequest {
    /// Text typed in directly; takes precedence over `script`
    pub text: Option<String>,
    /// Text file read when `text` is blank
    pub script: Option<PathBuf>,
    /// Name of the output file and of the folder holding the passages
    pub name: String,
    pub voice: VoiceOption,
    pub voice_b: VoiceOption,
    pub voice_c: VoiceOption,
    pub preset: Preset,
    pub seed: Option<u64>,
    /// 1-based passage numbers to resynthesize; blank means all
    pub regenerate: String,
    pub split: SplitMode,
}

impl LongformRequest {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            script: None,
            name: name.into(),
            voice: VoiceOption::default(),
            voice_b: VoiceOption::Disabled,
            voice_c: VoiceOption::Disabled,
            preset: Preset::default(),
            seed: None,
            regenerate: String::new(),
            split: SplitMode::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LongformOutput {
    pub audio: AudioData,
    pub passages: Vec<String>,
    pub output_path: PathBuf,
}

impl LongformOutput {
    /// `(1) first passage`, one per line
    pub fn listing(&self) -> String {
        numbered_listing(&self.passages)
    }
}

pub fn numbered_listing(passages: &[String]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(idx, passage)| format!("({}) {}", idx + 1, passage))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a regenerate list such as `"2 5"` or `"2, 5"`.
///
/// Blank input means "regenerate everything" and yields `None`.
pub fn parse_regenerate(input: &str) -> FrontendResult<Option<BTreeSet<usize>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let mut indices = BTreeSet::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let index: usize = token.parse().map_err(|_| {
            FrontendError::validation(format!("Invalid clip index '{}' in regenerate list", token))
        })?;
        if index == 0 {
            return Err(FrontendError::validation(
                "Clip indices start from 1",
            ));
        }
        indices.insert(index);
    }
    Ok(Some(indices))
}

impl SpeechSession {
    /// Narrate a whole script, reusing saved passages outside the regenerate list.
    pub async fn longform(&self, request: LongformRequest) -> FrontendResult<LongformOutput> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(FrontendError::validation("No name provided"));
        }

        let text = match request.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => {
                let script = request.script.as_ref().ok_or_else(|| {
                    FrontendError::validation(
                        "Please provide either text or script file with content.",
                    )
                })?;
                let contents = tokio::fs::read_to_string(script).await?;
                if contents.trim().is_empty() {
                    return Err(FrontendError::validation(
                        "Please provide either text or script file with content.",
                    ));
                }
                contents
            }
        };

        let regenerate = parse_regenerate(&request.regenerate)?;
        require_stock_voice(request.voice)?;
        require_secondary_voices([request.voice_b, request.voice_c])?;

        let passages = split_passages(&text, request.split, self.config.split);
        if passages.is_empty() {
            return Err(FrontendError::validation(
                "The text contains nothing to narrate.",
            ));
        }

        let passage_dir = self.config.longform_dir.join(name);
        let passage_path = |number: usize| passage_dir.join(format!("{number}.wav"));
        let reuse = |number: usize| {
            regenerate
                .as_ref()
                .is_some_and(|wanted| !wanted.contains(&number))
        };

        if let Some(wanted) = &regenerate
            && let Some(beyond) = wanted.iter().find(|&&n| n > passages.len())
        {
            log::warn!(
                "Regenerate index {} is past the last passage ({})",
                beyond,
                passages.len()
            );
        }
        for number in (1..=passages.len()).filter(|&n| reuse(n)) {
            let path = passage_path(number);
            let saved = tokio::fs::metadata(&path)
                .await
                .is_ok_and(|meta| meta.is_file());
            if !saved {
                return Err(FrontendError::validation(format!(
                    "Passage {} has no saved audio at {}; add it to the regenerate list",
                    number,
                    path.display()
                )));
            }
        }

        tokio::fs::create_dir_all(&passage_dir).await?;

        let voices = assemble_voices(request.voice, request.voice_b, request.voice_c);
        let material = if voices.len() == 1 {
            self.store.load_voice(voices[0]).await?
        } else {
            self.store.load_voices(&voices).await?
        };

        log::info!(
            "Narrating '{}' as {} passage(s) with voice(s) [{}]",
            name,
            passages.len(),
            crate::voices::join_identifiers(&voices)
        );
        let started = Instant::now();
        let sample_rate = self.model.output_sample_rate();
        let template =
            SynthesisRequest::new(String::new(), material, request.preset).with_seed(request.seed);

        let mut parts = Vec::with_capacity(passages.len());
        for (idx, passage) in passages.iter().enumerate() {
            let number = idx + 1;
            let path = passage_path(number);

            if reuse(number) {
                log::debug!("Reusing passage {} from {}", number, path.display());
                parts.push(read_passage(path, sample_rate).await?);
                continue;
            }

            log::info!("Synthesizing passage {}/{}", number, passages.len());
            let passage_request = SynthesisRequest {
                text: passage.clone(),
                ..template.clone()
            };
            let audio = self.model.tts_with_preset(passage_request).await?.into_first()?;
            parts.push(save_audio(path, audio).await?);
        }

        let audio = AudioData::concat(&parts)?;
        let output_path = self.config.output_dir.join(format!("{name}.wav"));
        let audio = save_audio(output_path.clone(), audio).await?;
        log::info!(
            "Wrote {:.1}s narration to {}",
            audio.duration_secs(),
            output_path.display()
        );

        self.log_run(
            &self.script_log,
            voices,
            passages.join(" "),
            request.preset,
            started,
            request.seed,
        );

        Ok(LongformOutput {
            audio,
            passages,
            output_path,
        })
    }
}

async fn read_passage(path: PathBuf, sample_rate: u32) -> FrontendResult<AudioData> {
    tokio::task::spawn_blocking(move || load_audio(&path, sample_rate))
        .await
        .map_err(std::io::Error::from)?
}

/// Write `audio` to `path` off the async runtime and hand it back.
async fn save_audio(path: PathBuf, audio: AudioData) -> FrontendResult<AudioData> {
    tokio::task::spawn_blocking(move || write_wav(&path, &audio).map(|()| audio))
        .await
        .map_err(std::io::Error::from)?
}
