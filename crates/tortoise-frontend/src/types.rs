use crate::error::{FrontendError, FrontendResult};
use crate::presets::Preset;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Sample rate voice clips are conditioned at.
pub const CONDITIONING_SAMPLE_RATE: u32 = 22_050;

/// Sample rate of every waveform the model generates.
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// Audio data with normalized samples
#[derive(Clone, Debug, PartialEq)]
pub struct AudioData {
    /// Audio samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Number of audio channels (typically 1 for mono)
    pub channels: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.channels as f64 / self.sample_rate as f64
    }

    /// Join clips end to end along the time axis.
    ///
    /// Every part must share the sample rate and channel count of the first.
    pub fn concat(parts: &[AudioData]) -> FrontendResult<AudioData> {
        let Some(first) = parts.first() else {
            return Err(FrontendError::Generation(
                "no audio passages to concatenate".to_string(),
            ));
        };

        let total = parts.iter().map(|p| p.samples.len()).sum();
        let mut samples = Vec::with_capacity(total);
        for (idx, part) in parts.iter().enumerate() {
            if part.sample_rate != first.sample_rate || part.channels != first.channels {
                return Err(FrontendError::InvalidVoiceData(format!(
                    "passage {} is {} Hz / {} ch, expected {} Hz / {} ch",
                    idx + 1,
                    part.sample_rate,
                    part.channels,
                    first.sample_rate,
                    first.channels
                )));
            }
            samples.extend_from_slice(&part.samples);
        }

        Ok(AudioData {
            samples,
            channels: first.channels,
            sample_rate: first.sample_rate,
        })
    }
}

impl Serialize for AudioData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AudioData", 3)?;

        // Serialize samples as base64
        let bytes: Vec<u8> = self.samples.iter().flat_map(|f| f.to_le_bytes()).collect();
        let base64_samples =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &bytes);

        state.serialize_field("samples", &base64_samples)?;
        state.serialize_field("channels", &self.channels)?;
        state.serialize_field("sample_rate", &self.sample_rate)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for AudioData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct AudioDataHelper {
            samples: String,
            channels: usize,
            sample_rate: u32,
        }

        let helper = AudioDataHelper::deserialize(deserializer)?;

        let bytes =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &helper.samples)
                .map_err(serde::de::Error::custom)?;
        if bytes.len() % 4 != 0 {
            return Err(serde::de::Error::custom(format!(
                "sample payload of {} bytes is not a whole number of f32 values",
                bytes.len()
            )));
        }

        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(AudioData {
            samples,
            channels: helper.channels,
            sample_rate: helper.sample_rate,
        })
    }
}

/// Precomputed summary of a speaker's identity, usable in place of raw clips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditioningLatents {
    /// Latent fed to the autoregressive decoder
    pub autoregressive: Vec<f32>,
    /// Latent fed to the diffusion decoder
    pub diffusion: Vec<f32>,
}

impl ConditioningLatents {
    /// Element-wise mean of several latent voices.
    pub fn average(latents: &[ConditioningLatents]) -> FrontendResult<ConditioningLatents> {
        let Some(first) = latents.first() else {
            return Err(FrontendError::InvalidVoiceData(
                "cannot average an empty set of latents".to_string(),
            ));
        };

        let mut autoregressive = vec![0.0f32; first.autoregressive.len()];
        let mut diffusion = vec![0.0f32; first.diffusion.len()];
        for latent in latents {
            if latent.autoregressive.len() != autoregressive.len()
                || latent.diffusion.len() != diffusion.len()
            {
                return Err(FrontendError::InvalidVoiceData(
                    "conditioning latents have mismatched shapes".to_string(),
                ));
            }
            for (acc, v) in autoregressive.iter_mut().zip(&latent.autoregressive) {
                *acc += v;
            }
            for (acc, v) in diffusion.iter_mut().zip(&latent.diffusion) {
                *acc += v;
            }
        }

        let n = latents.len() as f32;
        autoregressive.iter_mut().for_each(|v| *v /= n);
        diffusion.iter_mut().for_each(|v| *v /= n);

        Ok(ConditioningLatents {
            autoregressive,
            diffusion,
        })
    }
}

/// What a voice store hands back for one or more voice names.
///
/// Both fields empty means "let the model pick a random speaker".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoiceMaterial {
    pub samples: Option<Vec<AudioData>>,
    pub latents: Option<ConditioningLatents>,
}

impl VoiceMaterial {
    pub fn random() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<AudioData>) -> Self {
        Self {
            samples: Some(samples),
            latents: None,
        }
    }

    pub fn from_latents(latents: ConditioningLatents) -> Self {
        Self {
            samples: None,
            latents: Some(latents),
        }
    }

    /// First reference clip, shown back to the user as "sample of selected voice".
    pub fn first_sample(&self) -> Option<&AudioData> {
        self.samples.as_ref().and_then(|s| s.first())
    }
}

/// One call against the speech model
///
/// Reference clips are shared, so cloning a request to change only its text
/// does not copy audio.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_samples: Option<Arc<[AudioData]>>,
    pub conditioning_latents: Option<ConditioningLatents>,
    pub preset: Preset,
    /// Number of candidate waveforms to generate
    pub k: usize,
    pub use_deterministic_seed: Option<u64>,
    /// Ask the model to report the seed it actually used
    pub return_deterministic_state: bool,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: VoiceMaterial, preset: Preset) -> Self {
        Self {
            text: text.into(),
            voice_samples: voice.samples.map(Arc::from),
            conditioning_latents: voice.latents,
            preset,
            k: 1,
            use_deterministic_seed: None,
            return_deterministic_state: false,
        }
    }

    pub fn with_candidates(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.use_deterministic_seed = seed;
        self
    }

    pub fn returning_seed(mut self) -> Self {
        self.return_deterministic_state = true;
        self
    }
}

/// Waveforms produced by one synthesis call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub candidates: Vec<AudioData>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SynthesisOutput {
    pub fn into_first(self) -> FrontendResult<AudioData> {
        self.candidates
            .into_iter()
            .next()
            .ok_or_else(|| FrontendError::Generation("model returned no audio".to_string()))
    }
}

/// Model information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,
    /// Model name
    pub name: String,
    /// Model description
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_data_serialization() {
        let audio = AudioData {
            samples: vec![0.0, 0.5, -0.5, 1.0],
            channels: 1,
            sample_rate: 24000,
        };

        let json = serde_json::to_string(&audio).unwrap();
        let deserialized: AudioData = serde_json::from_str(&json).unwrap();

        assert_eq!(audio, deserialized);
    }

    #[test]
    fn test_audio_data_rejects_truncated_payload() {
        let json = r#"{"samples":"AAA=","channels":1,"sample_rate":24000}"#;
        assert!(serde_json::from_str::<AudioData>(json).is_err());
    }

    #[test]
    fn test_concat_keeps_order() {
        let a = AudioData::mono(vec![0.1, 0.2], OUTPUT_SAMPLE_RATE);
        let b = AudioData::mono(vec![0.3], OUTPUT_SAMPLE_RATE);
        let joined = AudioData::concat(&[a, b]).unwrap();
        assert_eq!(joined.samples, vec![0.1, 0.2, 0.3]);
        assert_eq!(joined.sample_rate, OUTPUT_SAMPLE_RATE);
    }

    #[test]
    fn test_concat_rejects_rate_mismatch() {
        let a = AudioData::mono(vec![0.1], OUTPUT_SAMPLE_RATE);
        let b = AudioData::mono(vec![0.3], CONDITIONING_SAMPLE_RATE);
        assert!(AudioData::concat(&[a, b]).is_err());
        assert!(AudioData::concat(&[]).is_err());
    }

    #[test]
    fn test_duration() {
        let audio = AudioData::mono(vec![0.0; 12_000], OUTPUT_SAMPLE_RATE);
        assert!((audio.duration_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_latent_average() {
        let a = ConditioningLatents {
            autoregressive: vec![1.0, 2.0],
            diffusion: vec![0.0],
        };
        let b = ConditioningLatents {
            autoregressive: vec![3.0, 4.0],
            diffusion: vec![2.0],
        };
        let avg = ConditioningLatents::average(&[a, b]).unwrap();
        assert_eq!(avg.autoregressive, vec![2.0, 3.0]);
        assert_eq!(avg.diffusion, vec![1.0]);
    }

    #[test]
    fn test_request_builder() {
        let request = SynthesisRequest::new("hi", VoiceMaterial::random(), Preset::Standard)
            .with_candidates(3)
            .with_seed(Some(7))
            .returning_seed();
        assert_eq!(request.k, 3);
        assert_eq!(request.use_deterministic_seed, Some(7));
        assert!(request.return_deterministic_state);
        assert!(request.voice_samples.is_none());
    }

    #[test]
    fn test_request_clone_shares_reference_clips() {
        let clip = AudioData::mono(vec![0.1; 8], CONDITIONING_SAMPLE_RATE);
        let template =
            SynthesisRequest::new("", VoiceMaterial::from_samples(vec![clip]), Preset::Fast);
        let request = SynthesisRequest {
            text: "Second passage.".to_string(),
            ..template.clone()
        };

        let (Some(shared), Some(original)) = (&request.voice_samples, &template.voice_samples)
        else {
            panic!("reference clips missing");
        };
        assert!(Arc::ptr_eq(shared, original));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["voice_samples"].as_array().map(Vec::len), Some(1));
    }
}
