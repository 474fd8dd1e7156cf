//! Append-only plain-text record of every synthesis run

use crate::error::FrontendResult;
use crate::presets::Preset;
use crate::voices::{VoiceOption, join_identifiers};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One line of the run log
#[derive(Debug, Clone)]
pub struct RunLogEntry {
    pub timestamp: DateTime<Local>,
    pub voices: Vec<VoiceOption>,
    pub text: String,
    pub preset: Preset,
    pub elapsed: Duration,
    pub seed: Option<u64>,
}

impl std::fmt::Display for RunLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seed = self
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "None".to_string());
        write!(
            f,
            "{} | Voice: {} | Text: {} | Quality: {} | Time Taken (s): {} | Seed: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            join_identifiers(&self.voices),
            self.text,
            self.preset,
            self.elapsed.as_secs_f64(),
            seed
        )
    }
}

/// Handle on a log file. Writes are unsynchronized appends.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &RunLogEntry) -> FrontendResult<()> {
        self.append_line(&format!("{entry}\n"))
    }

    /// Separator written once when a long-form front-end starts up.
    pub fn write_banner(&self) -> FrontendResult<()> {
        self.append_line(&format!(
            "\n\n-------------------------Tortoise TTS Scripts Logs, {}-------------------------\n",
            Local::now().format(TIMESTAMP_FORMAT)
        ))
    }

    fn append_line(&self, line: &str) -> FrontendResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
