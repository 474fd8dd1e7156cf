//! Front-end operations: map user inputs to one model call
//!
//! A [`SpeechSession`] owns the model, the voice store, and the run logs.
//! Each operation validates its inputs before touching the model, so a
//! rejected request never costs a synthesis.

use crate::config::FrontendConfig;
use crate::error::{FrontendError, FrontendResult};
use crate::presets::Preset;
use crate::prompt::{Emotion, apply_prompt};
use crate::provider::{SpeechModel, VoiceStore};
use crate::runlog::{RunLog, RunLogEntry};
use crate::types::{AudioData, CONDITIONING_SAMPLE_RATE, SynthesisRequest, VoiceMaterial};
use crate::voices::{VoiceOption, assemble_voices};
use std::sync::Arc;
use std::time::Instant;

/// Inputs of the single-voice front-end
#[derive(Debug, Clone)]
pub struct BasicRequest {
    pub text: String,
    pub voice: VoiceOption,
    pub preset: Preset,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct BasicOutput {
    /// First reference clip of the selected voice, if it has any
    pub voice_sample: Option<AudioData>,
    pub audio: AudioData,
}

/// Inputs of the emotion / multi-voice / custom-voice front-end
#[derive(Debug, Clone)]
pub struct ExpressiveRequest {
    pub text: String,
    pub emotion: Emotion,
    /// Free-form stage direction, used only with the neutral emotion
    pub prompt: String,
    pub voice: VoiceOption,
    /// Recorded clip, required when `voice` is `custom_voice`
    pub custom_audio: Option<AudioData>,
    pub voice_b: VoiceOption,
    pub voice_c: VoiceOption,
    pub preset: Preset,
    pub seed: Option<u64>,
}

impl ExpressiveRequest {
    pub fn new(text: impl Into<String>, voice: VoiceOption) -> Self {
        Self {
            text: text.into(),
            emotion: Emotion::default(),
            prompt: String::new(),
            voice,
            custom_audio: None,
            voice_b: VoiceOption::Disabled,
            voice_c: VoiceOption::Disabled,
            preset: Preset::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressiveOutput {
    pub voice_sample: Option<AudioData>,
    pub candidates: Vec<AudioData>,
    /// Seed the model reports having used
    pub seed: Option<u64>,
}

pub struct SpeechSession {
    pub(crate) model: Arc<dyn SpeechModel>,
    pub(crate) store: Arc<dyn VoiceStore>,
    pub(crate) config: FrontendConfig,
    pub(crate) run_log: RunLog,
    pub(crate) script_log: RunLog,
}

impl SpeechSession {
    pub fn new(
        model: Arc<dyn SpeechModel>,
        store: Arc<dyn VoiceStore>,
        config: FrontendConfig,
    ) -> Self {
        let run_log = RunLog::new(config.run_log.clone());
        let script_log = RunLog::new(config.script_log.clone());
        Self {
            model,
            store,
            config,
            run_log,
            script_log,
        }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<dyn SpeechModel> {
        &self.model
    }

    pub fn store(&self) -> &Arc<dyn VoiceStore> {
        &self.store
    }

    /// Log that long-form runs append to.
    pub fn script_log(&self) -> &RunLog {
        &self.script_log
    }

    /// Synthesize `text` with one stock voice.
    pub async fn basic(&self, request: BasicRequest) -> FrontendResult<BasicOutput> {
        require_text(&request.text)?;
        require_stock_voice(request.voice)?;

        let material = self.store.load_voice(request.voice).await?;
        let voice_sample = material.first_sample().cloned();

        let started = Instant::now();
        let output = self
            .model
            .tts_with_preset(
                SynthesisRequest::new(request.text.clone(), material, request.preset)
                    .with_seed(request.seed),
            )
            .await?;
        let audio = output.into_first()?;

        self.log_run(
            &self.run_log,
            vec![request.voice],
            request.text,
            request.preset,
            started,
            request.seed,
        );

        Ok(BasicOutput {
            voice_sample,
            audio,
        })
    }

    /// Synthesize several candidates with emotion prompting and voice mixing.
    pub async fn expressive(&self, request: ExpressiveRequest) -> FrontendResult<ExpressiveOutput> {
        require_text(&request.text)?;
        if request.voice == VoiceOption::Disabled {
            return Err(FrontendError::validation(
                "The first voice cannot be disabled",
            ));
        }
        require_secondary_voices([request.voice_b, request.voice_c])?;

        let custom = if request.voice == VoiceOption::CustomVoice {
            let audio = request.custom_audio.clone().ok_or_else(|| {
                FrontendError::validation(
                    "Please provide audio from mic when choosing custom voice",
                )
            })?;
            if audio.channels != 1 || audio.sample_rate != CONDITIONING_SAMPLE_RATE {
                return Err(FrontendError::InvalidVoiceData(format!(
                    "custom voice audio must be mono {} Hz, got {} ch at {} Hz",
                    CONDITIONING_SAMPLE_RATE, audio.channels, audio.sample_rate
                )));
            }
            Some(audio)
        } else {
            None
        };

        let voices = assemble_voices(request.voice, request.voice_b, request.voice_c);
        let text = apply_prompt(&request.text, request.emotion, &request.prompt);

        let material = self.load_material(&voices, custom).await?;
        let voice_sample = material.first_sample().cloned();

        log::info!(
            "Generating {} candidate(s) with voice(s) [{}] at preset {}",
            self.config.candidates,
            crate::voices::join_identifiers(&voices),
            request.preset
        );
        let started = Instant::now();
        let output = self
            .model
            .tts_with_preset(
                SynthesisRequest::new(text.clone(), material, request.preset)
                    .with_candidates(self.config.candidates)
                    .with_seed(request.seed)
                    .returning_seed(),
            )
            .await?;
        if output.candidates.is_empty() {
            return Err(FrontendError::Generation("model returned no audio".to_string()));
        }
        let seed = output.seed.or(request.seed);

        self.log_run(&self.run_log, voices, text, request.preset, started, seed);

        Ok(ExpressiveOutput {
            voice_sample,
            candidates: output.candidates,
            seed,
        })
    }

    /// Single voice goes through `load_voice`, several through `load_voices`;
    /// a custom clip is appended after the stored material.
    async fn load_material(
        &self,
        voices: &[VoiceOption],
        custom: Option<AudioData>,
    ) -> FrontendResult<VoiceMaterial> {
        let material = match voices {
            [] => VoiceMaterial::random(),
            [single] => self.store.load_voice(*single).await?,
            many => self.store.load_voices(many).await?,
        };

        let Some(custom) = custom else {
            return Ok(material);
        };
        match material {
            VoiceMaterial {
                latents: Some(_), ..
            } => Err(FrontendError::InvalidVoiceData(
                "a recorded voice cannot be combined with latent-only voices".to_string(),
            )),
            VoiceMaterial { samples, .. } => {
                let mut samples = samples.unwrap_or_default();
                samples.push(custom);
                Ok(VoiceMaterial::from_samples(samples))
            }
        }
    }

    pub(crate) fn log_run(
        &self,
        log: &RunLog,
        voices: Vec<VoiceOption>,
        text: String,
        preset: Preset,
        started: Instant,
        seed: Option<u64>,
    ) {
        let entry = RunLogEntry {
            timestamp: chrono::Local::now(),
            voices,
            text,
            preset,
            elapsed: started.elapsed(),
            seed,
        };
        log::info!("Synthesis finished in {:.2}s", entry.elapsed.as_secs_f64());
        // a failed log write does not fail the run
        if let Err(e) = log.append(&entry) {
            log::warn!("Failed to append to run log {}: {}", log.path().display(), e);
        }
    }
}

pub(crate) fn require_text(text: &str) -> FrontendResult<()> {
    if text.trim().is_empty() {
        return Err(FrontendError::validation("Please provide text to synthesize."));
    }
    Ok(())
}

/// Voices that come straight from the store: anything but `custom_voice` and `disabled`.
pub(crate) fn require_stock_voice(voice: VoiceOption) -> FrontendResult<()> {
    match voice {
        VoiceOption::CustomVoice | VoiceOption::Disabled => Err(FrontendError::validation(
            format!("Voice '{}' cannot be used here", voice),
        )),
        _ => Ok(()),
    }
}

/// The second and third voice slots take stock voices or `disabled`.
pub(crate) fn require_secondary_voices(voices: [VoiceOption; 2]) -> FrontendResult<()> {
    if voices.contains(&VoiceOption::CustomVoice) {
        return Err(FrontendError::validation(
            "Custom voice can only be chosen as the first voice",
        ));
    }
    Ok(())
}
