//! Video Summarizer - turn a video's audio track into a length-constrained summary
//!
//! The library sequences four stages: audio acquisition (yt-dlp or direct download),
//! transcription (Whisper or AWS Transcribe), summarization (Gemini) and text analytics
//! computed locally from the transcript.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod transcribe;
pub mod utils;

pub use analytics::{calculate_metrics, AnalyticsResult};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{AudioHandle, AudioSource, ExtractorRegistry, MediaExtractor};
pub use pipeline::{Stage, SummaryPipeline, SummaryRequest, SummaryResult};
pub use summarize::{SummarizeCall, Summarizer};
pub use transcribe::{Transcriber, Transcript};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Caller input rejected before any external call is made
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: &'static str,

    /// Human-readable explanation
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure of a single pipeline run, naming the stage that failed
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not acquire audio: {0:#}")]
    Acquisition(#[source] anyhow::Error),

    #[error("could not transcribe audio: {0:#}")]
    Transcription(#[source] anyhow::Error),

    #[error("could not summarize transcript: {0:#}")]
    Summarization(#[source] anyhow::Error),
}

impl PipelineError {
    /// The stage that produced this error, `None` for rejected input
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Validation(_) => None,
            PipelineError::Acquisition(_) => Some(Stage::Acquisition),
            PipelineError::Transcription(_) => Some(Stage::Transcription),
            PipelineError::Summarization(_) => Some(Stage::Summarization),
        }
    }
}
