use async_trait::async_trait;

pub mod gemini;
pub mod request;

pub use gemini::GeminiClient;
pub use request::{validate_length_hints, SummarizeCall};

use crate::Result;

/// Summarization backend.
///
/// Output is best-effort: a summary that ignores the length hints is still a success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a summary of `call.text`
    async fn summarize(&self, call: &SummarizeCall) -> Result<String>;
}
