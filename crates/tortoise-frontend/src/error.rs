use thiserror::Error;

/// Errors raised while preparing or running a synthesis
#[derive(Error, Debug)]
pub enum FrontendError {
    /// Missing or malformed user input, reported back to whoever filled in the form
    #[error("{0}")]
    Validation(String),

    /// Voice name is not in the catalog or not present on disk
    #[error("Voice not found: '{0}'")]
    VoiceNotFound(String),

    /// Invalid voice data
    #[error("Invalid voice data: {0}")]
    InvalidVoiceData(String),

    /// Audio generation failed
    #[error("Audio generation failed: {0}")]
    Generation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV encoding or decoding error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[cfg(feature = "server")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FrontendError {
    pub fn validation(message: impl Into<String>) -> Self {
        FrontendError::Validation(message.into())
    }

    /// Whether this error should be shown to the user as an input problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, FrontendError::Validation(_))
    }
}

impl From<serde_json::Error> for FrontendError {
    fn from(err: serde_json::Error) -> Self {
        FrontendError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FrontendError {
    fn from(err: toml::de::Error) -> Self {
        FrontendError::Configuration(err.to_string())
    }
}

/// Result type for front-end operations
pub type FrontendResult<T> = Result<T, FrontendError>;
