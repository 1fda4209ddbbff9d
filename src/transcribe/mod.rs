use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, TranscriptionBackend};
use crate::extractors::AudioHandle;

pub mod aws;
pub mod processor;
pub mod whisper;

pub use aws::AwsTranscriber;
pub use whisper::WhisperTranscriber;

use crate::Result;

/// Model profile used when the caller does not pick one
pub const DEFAULT_MODEL_HINT: &str = "base";

/// Text produced by a transcription backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// The transcribed text, empty when the audio contained no speech
    pub text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Speech-to-text backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a locally stored audio file.
    ///
    /// `model_hint` selects an accuracy/speed profile; backends without model choice ignore it.
    async fn transcribe(&self, audio: &AudioHandle, model_hint: &str) -> Result<Transcript>;

    /// Name used in logs
    fn backend_name(&self) -> &'static str;
}

/// Build the transcription backend selected in the configuration
pub async fn build_transcriber(config: &Config) -> Result<Box<dyn Transcriber>> {
    match config.transcription.backend {
        TranscriptionBackend::Whisper => Ok(Box::new(WhisperTranscriber::from_config(
            &config.transcription,
        ))),
        TranscriptionBackend::Aws => Ok(Box::new(AwsTranscriber::new(config).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_emptiness() {
        assert!(Transcript::new("").is_empty());
        assert!(Transcript::new("  \n").is_empty());
        assert!(!Transcript::new(" hello").is_empty());
    }
}
