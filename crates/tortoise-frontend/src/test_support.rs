//! In-memory model and voice store for unit tests

use crate::error::{FrontendError, FrontendResult};
use crate::provider::{SpeechModel, VoiceStore};
use crate::types::{
    AudioData, CONDITIONING_SAMPLE_RATE, ModelInfo, OUTPUT_SAMPLE_RATE, SynthesisOutput,
    SynthesisRequest, VoiceMaterial,
};
use crate::voices::VoiceOption;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns `k` candidates per call; candidate `i` is four samples of value
/// `call_number + i / 10`. Reports the requested seed, or 99 when none.
#[derive(Default)]
pub struct RecordingModel {
    pub requests: Mutex<Vec<SynthesisRequest>>,
}

impl RecordingModel {
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechModel for RecordingModel {
    async fn tts_with_preset(&self, request: SynthesisRequest) -> FrontendResult<SynthesisOutput> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        let call = requests.len() as f32;
        let candidates = (0..request.k)
            .map(|i| AudioData::mono(vec![call + i as f32 / 10.0; 4], OUTPUT_SAMPLE_RATE))
            .collect();
        Ok(SynthesisOutput {
            candidates,
            seed: Some(request.use_deterministic_seed.unwrap_or(99)),
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            id: "recording".to_string(),
            name: "Recording model".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Single(VoiceOption),
    Multi(Vec<VoiceOption>),
}

/// Voice `v` has one clip filled with `clip_value(v)`.
#[derive(Default)]
pub struct FakeStore {
    pub latent_voices: HashMap<VoiceOption, crate::types::ConditioningLatents>,
    pub calls: Mutex<Vec<StoreCall>>,
}

pub fn clip_value(voice: VoiceOption) -> f32 {
    let idx = VoiceOption::all()
        .iter()
        .position(|v| *v == voice)
        .unwrap_or_default();
    idx as f32 / 100.0
}

impl FakeStore {
    fn material(&self, voice: VoiceOption) -> FrontendResult<VoiceMaterial> {
        if voice == VoiceOption::Random {
            return Ok(VoiceMaterial::random());
        }
        if voice.is_sentinel() {
            return Err(FrontendError::VoiceNotFound(voice.to_string()));
        }
        if let Some(latents) = self.latent_voices.get(&voice) {
            return Ok(VoiceMaterial::from_latents(latents.clone()));
        }
        Ok(VoiceMaterial::from_samples(vec![AudioData::mono(
            vec![clip_value(voice); 2],
            CONDITIONING_SAMPLE_RATE,
        )]))
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceStore for FakeStore {
    async fn load_voice(&self, voice: VoiceOption) -> FrontendResult<VoiceMaterial> {
        self.calls.lock().unwrap().push(StoreCall::Single(voice));
        self.material(voice)
    }

    async fn load_voices(&self, voices: &[VoiceOption]) -> FrontendResult<VoiceMaterial> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Multi(voices.to_vec()));
        if voices.contains(&VoiceOption::Random) {
            return Ok(VoiceMaterial::random());
        }
        let mut samples = Vec::new();
        for voice in voices {
            if let Some(clips) = self.material(*voice)?.samples {
                samples.extend(clips);
            }
        }
        Ok(VoiceMaterial::from_samples(samples))
    }

    fn available_voices(&self) -> Vec<VoiceOption> {
        VoiceOption::named().collect()
    }
}
