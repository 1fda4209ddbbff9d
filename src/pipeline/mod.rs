use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::analytics::{calculate_metrics, AnalyticsResult};
use crate::extractors::AudioSource;
use crate::summarize::{validate_length_hints, SummarizeCall, Summarizer};
use crate::transcribe::{Transcriber, Transcript, DEFAULT_MODEL_HINT};
use crate::utils::{format_duration, stage_spinner, validate_source_url};
use crate::{PipelineError, ValidationError};

/// One sequential unit of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Acquisition,
    Transcription,
    Summarization,
    Analytics,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Acquisition => write!(f, "acquisition"),
            Stage::Transcription => write!(f, "transcription"),
            Stage::Summarization => write!(f, "summarization"),
            Stage::Analytics => write!(f, "analytics"),
        }
    }
}

/// Caller input for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Video or media URL to summarize
    pub source_url: String,

    /// Paragraph target for the summary
    pub paragraph_count: u32,

    /// Character cap for the summary
    pub max_characters: u32,

    /// Speech model profile; the pipeline default applies when absent
    pub model_hint: Option<String>,
}

impl SummaryRequest {
    pub fn new(source_url: impl Into<String>, paragraph_count: u32, max_characters: u32) -> Self {
        Self {
            source_url: source_url.into().trim().to_string(),
            paragraph_count,
            max_characters,
            model_hint: None,
        }
    }

    pub fn with_model_hint(mut self, model_hint: impl Into<String>) -> Self {
        self.model_hint = Some(model_hint.into());
        self
    }

    /// Reject the request before any external call is made
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_source_url(&self.source_url)?;
        validate_length_hints(self.paragraph_count, self.max_characters)?;

        if let Some(hint) = &self.model_hint {
            if hint.trim().is_empty() {
                return Err(ValidationError::new("model_hint", "must not be blank"));
            }
        }

        Ok(())
    }
}

/// Everything one successful run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary_text: String,
    pub transcript: Transcript,
    pub analytics: AnalyticsResult,
}

/// Sequences acquisition, transcription, summarization and analytics.
///
/// Each stage runs once; the first failure ends the run and no partial
/// result is returned. Media produced by acquisition stays owned by the
/// audio source.
pub struct SummaryPipeline {
    audio_source: Box<dyn AudioSource>,
    transcriber: Box<dyn Transcriber>,
    summarizer: Box<dyn Summarizer>,
    default_model_hint: String,
    show_progress: bool,
}

impl SummaryPipeline {
    pub fn new(
        audio_source: Box<dyn AudioSource>,
        transcriber: Box<dyn Transcriber>,
        summarizer: Box<dyn Summarizer>,
    ) -> Self {
        Self {
            audio_source,
            transcriber,
            summarizer,
            default_model_hint: DEFAULT_MODEL_HINT.to_string(),
            show_progress: false,
        }
    }

    /// Model profile used when a request carries none
    pub fn with_default_model_hint(mut self, model_hint: impl Into<String>) -> Self {
        self.default_model_hint = model_hint.into();
        self
    }

    /// Show a spinner while each stage runs
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run all stages for one request
    pub async fn run(&self, request: &SummaryRequest) -> Result<SummaryResult, PipelineError> {
        request.validate()?;

        let model_hint = request
            .model_hint
            .as_deref()
            .unwrap_or(&self.default_model_hint);

        let started = Instant::now();
        let progress = stage_spinner("Downloading audio...", self.show_progress);
        let audio = self
            .audio_source
            .acquire(request.source_url.trim())
            .await
            .map_err(PipelineError::Acquisition);
        progress.finish_and_clear();
        let audio = audio?;
        tracing::info!(
            stage = %Stage::Acquisition,
            elapsed = %format_duration(started.elapsed()),
            path = %audio.path.display(),
            "Audio acquired"
        );

        let started = Instant::now();
        let progress = stage_spinner("Transcribing audio...", self.show_progress);
        let transcript = self
            .transcriber
            .transcribe(&audio, model_hint)
            .await
            .map_err(PipelineError::Transcription);
        progress.finish_and_clear();
        let transcript = transcript?;
        if transcript.is_empty() {
            tracing::warn!(stage = %Stage::Transcription, "Transcription produced no text");
        }
        tracing::info!(
            stage = %Stage::Transcription,
            backend = self.transcriber.backend_name(),
            model = model_hint,
            elapsed = %format_duration(started.elapsed()),
            chars = transcript.text.chars().count(),
            "Audio transcribed"
        );

        let call = SummarizeCall::build(&transcript, request.paragraph_count, request.max_characters)?;

        let started = Instant::now();
        let progress = stage_spinner("Generating summary...", self.show_progress);
        let summary_text = self
            .summarizer
            .summarize(&call)
            .await
            .map_err(PipelineError::Summarization);
        progress.finish_and_clear();
        let summary_text = summary_text?;

        let summary_chars = summary_text.chars().count();
        if summary_chars > request.max_characters as usize {
            tracing::debug!(
                "Summary has {} characters, above the requested {}",
                summary_chars,
                request.max_characters
            );
        }
        tracing::info!(
            stage = %Stage::Summarization,
            elapsed = %format_duration(started.elapsed()),
            chars = summary_chars,
            "Summary generated"
        );

        let analytics = calculate_metrics(&transcript.text);
        tracing::debug!(
            stage = %Stage::Analytics,
            words = analytics.word_count,
            "Metrics calculated"
        );

        Ok(SummaryResult {
            summary_text,
            transcript,
            analytics,
        })
    }
}
