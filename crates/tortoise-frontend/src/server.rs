//! Speech model served over HTTP
//!
//! The request record is posted as JSON to `{base_url}/v1/tts_with_preset`;
//! the server answers with `{"candidates": [AudioData], "seed": u64 | null}`.

use crate::config::ServerConfig;
use crate::error::{FrontendError, FrontendResult};
use crate::provider::SpeechModel;
use crate::types::{ModelInfo, SynthesisOutput, SynthesisRequest};
use async_trait::async_trait;
use std::time::Duration;

pub struct HttpSpeechModel {
    /// HTTP client
    client: reqwest::Client,
    /// Configuration
    config: ServerConfig,
}

impl HttpSpeechModel {
    pub fn new(config: ServerConfig) -> FrontendResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(FrontendError::Configuration(
                "server base_url must not be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl SpeechModel for HttpSpeechModel {
    async fn tts_with_preset(&self, request: SynthesisRequest) -> FrontendResult<SynthesisOutput> {
        let url = self.endpoint("/v1/tts_with_preset");
        log::debug!(
            "POST {} ({} chars, preset {}, k={})",
            url,
            request.text.chars().count(),
            request.preset,
            request.k
        );

        let mut req_builder = self.client.post(&url).json(&request);

        if let Some(api_key) = &self.config.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(FrontendError::Generation(format!(
                "Server returned error {}: {}",
                status, body
            )));
        }

        let output: SynthesisOutput = response.json().await?;
        if output.candidates.is_empty() {
            return Err(FrontendError::Generation(
                "server returned no candidates".to_string(),
            ));
        }

        Ok(output)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            id: "tortoise".to_string(),
            name: "Tortoise TTS".to_string(),
            description: Some(format!("remote model at {}", self.config.base_url)),
        }
    }
}
