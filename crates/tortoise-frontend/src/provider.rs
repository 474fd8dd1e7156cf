use crate::error::FrontendResult;
use crate::types::{ModelInfo, SynthesisOutput, SynthesisRequest, VoiceMaterial};
use crate::voices::VoiceOption;
use async_trait::async_trait;

/// The pretrained speech model the front-ends drive.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Generate `request.k` candidate waveforms for the request text.
    ///
    /// When `return_deterministic_state` is set the output carries the seed
    /// the model resolved, which may differ from the one requested when none
    /// was given.
    async fn tts_with_preset(&self, request: SynthesisRequest) -> FrontendResult<SynthesisOutput>;

    /// Get current model information
    fn model_info(&self) -> ModelInfo;

    /// Sample rate of generated audio
    fn output_sample_rate(&self) -> u32 {
        crate::types::OUTPUT_SAMPLE_RATE
    }
}

/// Looks up reference audio or precomputed latents by voice name.
#[async_trait]
pub trait VoiceStore: Send + Sync {
    /// Material for one voice. `random` yields empty material.
    async fn load_voice(&self, voice: VoiceOption) -> FrontendResult<VoiceMaterial>;

    /// Material for several voices merged into one speaker.
    async fn load_voices(&self, voices: &[VoiceOption]) -> FrontendResult<VoiceMaterial>;

    /// Voices this store can actually serve
    fn available_voices(&self) -> Vec<VoiceOption>;
}
