//! Front-end configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::error::{FrontendError, FrontendResult};
use crate::text::SplitLengths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Directories holding one sub-directory per voice; later entries win
    #[serde(default = "default_voice_dirs")]
    pub voice_dirs: Vec<PathBuf>,

    /// Where combined long-form narrations are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Where per-passage long-form clips are kept for later reuse
    #[serde(default = "default_longform_dir")]
    pub longform_dir: PathBuf,

    #[serde(default = "default_run_log")]
    pub run_log: PathBuf,

    /// Run log used by the long-form front-end
    #[serde(default = "default_script_log")]
    pub script_log: PathBuf,

    /// Candidates generated per expressive request
    #[serde(default = "default_candidates")]
    pub candidates: usize,

    #[serde(default)]
    pub split: SplitLengths,

    #[cfg(feature = "server")]
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection to a remote model server
#[cfg(feature = "server")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 600)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_voice_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("voices")]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_longform_dir() -> PathBuf {
    PathBuf::from("longform")
}

fn default_run_log() -> PathBuf {
    PathBuf::from("Tortoise_TTS_Runs.log")
}

fn default_script_log() -> PathBuf {
    PathBuf::from("Tortoise_TTS_Runs_Scripts.log")
}

fn default_candidates() -> usize {
    3
}

#[cfg(feature = "server")]
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

// high_quality synthesis of a single passage can take minutes
#[cfg(feature = "server")]
fn default_timeout() -> u64 {
    600
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            voice_dirs: default_voice_dirs(),
            output_dir: default_output_dir(),
            longform_dir: default_longform_dir(),
            run_log: default_run_log(),
            script_log: default_script_log(),
            candidates: default_candidates(),
            split: SplitLengths::default(),
            #[cfg(feature = "server")]
            server: ServerConfig::default(),
        }
    }
}

#[cfg(feature = "server")]
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl FrontendConfig {
    /// Platform config location, e.g. `~/.config/tortoise-frontend/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tortoise-frontend").join("config.toml"))
    }

    pub fn from_toml_str(raw: &str) -> FrontendResult<Self> {
        let config: FrontendConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> FrontendResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Load `path` if given, else the platform default if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> FrontendResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> FrontendResult<()> {
        if self.candidates == 0 {
            return Err(FrontendError::Configuration(
                "candidates must be at least 1".to_string(),
            ));
        }
        if self.split.desired == 0 || self.split.desired > self.split.max {
            return Err(FrontendError::Configuration(format!(
                "split lengths must satisfy 0 < desired ({}) <= max ({})",
                self.split.desired, self.split.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FrontendConfig::default();
        assert_eq!(config.voice_dirs, vec![PathBuf::from("voices")]);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.longform_dir, PathBuf::from("longform"));
        assert_eq!(config.candidates, 3);
        assert_eq!(config.split, SplitLengths { desired: 200, max: 300 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = FrontendConfig::from_toml_str("").unwrap();
        assert_eq!(config.run_log, PathBuf::from("Tortoise_TTS_Runs.log"));
        assert_eq!(
            config.script_log,
            PathBuf::from("Tortoise_TTS_Runs_Scripts.log")
        );
    }

    #[test]
    fn test_partial_toml() {
        let raw = r#"
voice_dirs = ["/opt/voices", "extra"]
candidates = 1

[split]
desired = 120
"#;
        let config = FrontendConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.voice_dirs.len(), 2);
        assert_eq!(config.candidates, 1);
        assert_eq!(config.split.desired, 120);
        assert_eq!(config.split.max, 300);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(FrontendConfig::from_toml_str("candidates = 0").is_err());
        assert!(FrontendConfig::from_toml_str("[split]\ndesired = 400").is_err());
        assert!(FrontendConfig::from_toml_str("candidates = \"three\"").is_err());
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_server_section() {
        let raw = r#"
[server]
base_url = "http://gpu-box:9000"
api_key = "secret"
"#;
        let config = FrontendConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.server.base_url, "http://gpu-box:9000");
        assert_eq!(config.server.api_key.as_deref(), Some("secret"));
        assert_eq!(config.server.timeout_secs, 600);
    }
}
