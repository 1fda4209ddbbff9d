use serde::Serialize;

use crate::transcribe::Transcript;
use crate::ValidationError;

/// Smallest accepted paragraph target
pub const MIN_PARAGRAPHS: u32 = 1;

/// Smallest accepted character cap
pub const MIN_MAX_CHARACTERS: u32 = 100;

/// Validated input for a summarization backend.
///
/// The length hints are advisory: backends receive them but the result is
/// never checked against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizeCall {
    pub text: String,
    pub paragraph_count: u32,
    pub max_characters: u32,
}

impl SummarizeCall {
    /// Package a transcript with its length hints, rejecting out-of-range hints
    pub fn build(
        transcript: &Transcript,
        paragraph_count: u32,
        max_characters: u32,
    ) -> Result<Self, ValidationError> {
        validate_length_hints(paragraph_count, max_characters)?;

        Ok(Self {
            text: transcript.text.clone(),
            paragraph_count,
            max_characters,
        })
    }

    /// Instruction text for generative backends
    pub fn prompt(&self) -> String {
        let paragraphs = if self.paragraph_count == 1 {
            "1 paragraph".to_string()
        } else {
            format!("{} paragraphs", self.paragraph_count)
        };

        format!(
            "Summarize the following video transcript in {paragraphs}. \
             Keep the whole summary under {} characters. \
             Reply with the summary only.\n\nTranscript:\n{}",
            self.max_characters, self.text
        )
    }
}

/// Check the paragraph target and character cap
pub fn validate_length_hints(
    paragraph_count: u32,
    max_characters: u32,
) -> Result<(), ValidationError> {
    if paragraph_count < MIN_PARAGRAPHS {
        return Err(ValidationError::new(
            "paragraph_count",
            format!("must be at least {}, got {}", MIN_PARAGRAPHS, paragraph_count),
        ));
    }

    if max_characters < MIN_MAX_CHARACTERS {
        return Err(ValidationError::new(
            "max_characters",
            format!("must be at least {}, got {}", MIN_MAX_CHARACTERS, max_characters),
        ));
    }

    Ok(())
}
