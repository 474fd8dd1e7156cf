//! # Tortoise Front-end
//!
//! Request assembly around a Tortoise text-to-speech model.
//!
//! The model itself sits behind the [`SpeechModel`] trait and reference voices
//! behind [`VoiceStore`]. This crate decides what to ask them for:
//!
//! - **Basic**: one stock voice, one clip
//! - **Expressive**: emotion or free-form prompt prefixes, up to three mixed
//!   voices plus an optional microphone recording, several candidates per run
//! - **Long-form**: a whole script split into passages, each saved to disk so
//!   individual passages can be regenerated later
//!
//! Every run is appended to a plain-text run log.
//!
//! ## Backends
//!
//! - `server` (default): [`server::HttpSpeechModel`] talks to a model served over HTTP
//! - [`DirectoryVoiceStore`] reads voices from `voices/<name>/*.wav` folders
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tortoise_frontend::{
//!     DirectoryVoiceStore, FrontendConfig, LongformRequest, SpeechModel, SpeechSession,
//! };
//!
//! async fn narrate(model: Arc<dyn SpeechModel>) {
//!     let config = FrontendConfig::default();
//!     let store = Arc::new(DirectoryVoiceStore::new(config.voice_dirs.clone()));
//!     let session = SpeechSession::new(model, store, config);
//!
//!     let output = session
//!         .longform(LongformRequest::new("chapter1", "It was a dark night. The end."))
//!         .await
//!         .unwrap();
//!     println!("{}", output.listing());
//! }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod longform;
pub mod presets;
pub mod prompt;
mod provider;
pub mod runlog;
pub mod session;
pub mod store;
pub mod text;
pub mod types;
pub mod voices;

#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod test_support;

pub use config::FrontendConfig;
pub use error::{FrontendError, FrontendResult};
pub use longform::{LongformOutput, LongformRequest, parse_regenerate};
pub use presets::Preset;
pub use prompt::{Emotion, apply_prompt};
pub use provider::{SpeechModel, VoiceStore};
pub use runlog::{RunLog, RunLogEntry};
pub use session::{BasicOutput, BasicRequest, ExpressiveOutput, ExpressiveRequest, SpeechSession};
pub use store::DirectoryVoiceStore;
pub use text::{SplitLengths, SplitMode};
pub use types::{
    AudioData, CONDITIONING_SAMPLE_RATE, ConditioningLatents, ModelInfo, OUTPUT_SAMPLE_RATE,
    SynthesisOutput, SynthesisRequest, VoiceMaterial,
};
pub use voices::{VoiceOption, assemble_voices};
