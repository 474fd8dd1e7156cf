//! Voice store backed by directories of reference clips
//!
//! Each root holds one sub-directory per voice. A voice directory contains
//! either `.wav` clips or a single `*.latents.json` file with precomputed
//! [`ConditioningLatents`]. When several roots define the same voice, the
//! later root wins.

use crate::audio::load_audio;
use crate::error::{FrontendError, FrontendResult};
use crate::provider::VoiceStore;
use crate::types::{CONDITIONING_SAMPLE_RATE, ConditioningLatents, VoiceMaterial};
use crate::voices::VoiceOption;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const LATENTS_SUFFIX: &str = ".latents.json";

#[derive(Debug, Clone)]
pub struct DirectoryVoiceStore {
    roots: Vec<PathBuf>,
}

impl DirectoryVoiceStore {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Map every recognized voice to its files.
    fn catalog(&self) -> FrontendResult<BTreeMap<VoiceOption, Vec<PathBuf>>> {
        let mut catalog = BTreeMap::new();

        for root in &self.roots {
            if !root.is_dir() {
                log::warn!("Voice directory does not exist: {}", root.display());
                continue;
            }
            for entry in std::fs::read_dir(root)? {
                let entry = entry?;
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let voice = match name.parse::<VoiceOption>() {
                    Ok(voice) if !voice.is_sentinel() => voice,
                    _ => {
                        log::debug!("Skipping unrecognized voice directory: {}", path.display());
                        continue;
                    }
                };
                catalog.insert(voice, voice_files(&path)?);
            }
        }

        Ok(catalog)
    }

    fn load_voice_blocking(&self, voice: VoiceOption) -> FrontendResult<VoiceMaterial> {
        if voice == VoiceOption::Random {
            return Ok(VoiceMaterial::random());
        }
        if voice.is_sentinel() {
            return Err(FrontendError::VoiceNotFound(voice.to_string()));
        }

        let mut catalog = self.catalog()?;
        let files = catalog
            .remove(&voice)
            .ok_or_else(|| FrontendError::VoiceNotFound(voice.to_string()))?;

        let (latent_files, clip_files): (Vec<_>, Vec<_>) =
            files.into_iter().partition(|p| is_latents_file(p));

        if !clip_files.is_empty() {
            let clips = clip_files
                .iter()
                .map(|p| load_audio(p, CONDITIONING_SAMPLE_RATE))
                .collect::<FrontendResult<Vec<_>>>()?;
            log::debug!("Loaded {} clip(s) for voice {}", clips.len(), voice);
            return Ok(VoiceMaterial::from_samples(clips));
        }

        match latent_files.as_slice() {
            [single] => {
                let raw = std::fs::read_to_string(single)?;
                let latents: ConditioningLatents = serde_json::from_str(&raw)?;
                log::debug!("Loaded conditioning latents for voice {}", voice);
                Ok(VoiceMaterial::from_latents(latents))
            }
            [] => Err(FrontendError::InvalidVoiceData(format!(
                "voice '{}' has no reference clips",
                voice
            ))),
            _ => Err(FrontendError::InvalidVoiceData(format!(
                "voice '{}' has {} latent files, expected one",
                voice,
                latent_files.len()
            ))),
        }
    }

    fn load_voices_blocking(&self, voices: &[VoiceOption]) -> FrontendResult<VoiceMaterial> {
        if voices.contains(&VoiceOption::Random) {
            if voices.len() > 1 {
                log::warn!("Cannot combine a random voice with other voices, using a random voice");
            }
            return Ok(VoiceMaterial::random());
        }

        let mut clips = Vec::new();
        let mut latents = Vec::new();
        for &voice in voices {
            let material = self.load_voice_blocking(voice)?;
            match (material.samples, material.latents) {
                (Some(samples), None) => {
                    if !latents.is_empty() {
                        return Err(mixed_voice_kinds());
                    }
                    clips.extend(samples);
                }
                (None, Some(latent)) => {
                    if !clips.is_empty() {
                        return Err(mixed_voice_kinds());
                    }
                    latents.push(latent);
                }
                _ => {}
            }
        }

        if latents.is_empty() {
            Ok(VoiceMaterial::from_samples(clips))
        } else {
            Ok(VoiceMaterial::from_latents(ConditioningLatents::average(
                &latents,
            )?))
        }
    }
}

#[async_trait]
impl VoiceStore for DirectoryVoiceStore {
    async fn load_voice(&self, voice: VoiceOption) -> FrontendResult<VoiceMaterial> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.load_voice_blocking(voice))
            .await
            .map_err(|e| FrontendError::InvalidVoiceData(format!("voice loading task failed: {e}")))?
    }

    async fn load_voices(&self, voices: &[VoiceOption]) -> FrontendResult<VoiceMaterial> {
        let store = self.clone();
        let voices = voices.to_vec();
        tokio::task::spawn_blocking(move || store.load_voices_blocking(&voices))
            .await
            .map_err(|e| FrontendError::InvalidVoiceData(format!("voice loading task failed: {e}")))?
    }

    fn available_voices(&self) -> Vec<VoiceOption> {
        match self.catalog() {
            Ok(catalog) => catalog.into_keys().collect(),
            Err(e) => {
                log::warn!("Failed to scan voice directories: {}", e);
                Vec::new()
            }
        }
    }
}

fn mixed_voice_kinds() -> FrontendError {
    FrontendError::InvalidVoiceData(
        "can only combine raw audio voices or latent voices, not both".to_string(),
    )
}

fn is_latents_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(LATENTS_SUFFIX))
}

fn voice_files(dir: &Path) -> FrontendResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if is_wav || is_latents_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
