use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{Transcriber, Transcript};
use crate::config::TranscriptionConfig;
use crate::extractors::AudioHandle;
use crate::Result;

/// Local transcription through the `whisper` command-line tool
pub struct WhisperTranscriber {
    whisper_path: String,
    language: Option<String>,
}

/// The part of whisper's JSON output we read
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
}

impl WhisperTranscriber {
    pub fn new(whisper_path: impl Into<String>, language: Option<String>) -> Self {
        Self {
            whisper_path: whisper_path.into(),
            language,
        }
    }

    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self::new(config.whisper_path.clone(), config.language.clone())
    }

    fn build_args(&self, audio_path: &Path, model_hint: &str, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            audio_path.to_string_lossy().into_owned(),
            "--model".to_string(),
            model_hint.to_string(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().into_owned(),
            "--verbose".to_string(),
            "False".to_string(),
        ];

        if let Some(language) = &self.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }

        args
    }
}

fn parse_output(json: &str) -> Result<Transcript> {
    let output: WhisperOutput =
        serde_json::from_str(json).context("Failed to parse whisper JSON output")?;
    Ok(Transcript::new(output.text.trim()))
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &AudioHandle, model_hint: &str) -> Result<Transcript> {
        let output_dir = tempfile::TempDir::new().context("Failed to create temporary directory")?;
        let args = self.build_args(&audio.path, model_hint, output_dir.path());

        tracing::debug!("Running {} {}", self.whisper_path, args.join(" "));

        let output = Command::new(&self.whisper_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run {}; is it installed?", self.whisper_path))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("whisper failed: {}", error.trim());
        }

        let stem = audio
            .path
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Audio path has no file name: {}", audio.path.display()))?;
        let json_path = output_dir
            .path()
            .join(format!("{}.json", stem.to_string_lossy()));

        let json = fs_err::read_to_string(&json_path)?;
        parse_output(&json)
    }

    fn backend_name(&self) -> &'static str {
        "whisper"
    }
}
