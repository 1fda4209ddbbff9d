use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{SummarizeCall, Summarizer};
use crate::config::SummarizationConfig;
use crate::Result;

/// Gemini `generateContent` client
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client. The API key is supplied by the caller, never read from the environment here.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    /// Create a client from the summarization section of the config
    pub fn from_config(api_key: impl Into<String>, config: &SummarizationConfig) -> Self {
        Self::new(api_key, config.model.clone(), config.endpoint.clone())
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Concatenate the text parts of the first candidate
fn extract_summary(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("malformed response: no candidates returned"))?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        anyhow::bail!(
            "malformed response: candidate has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(text.trim().to_string())
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, call: &SummarizeCall) -> Result<String> {
        let prompt = call.prompt();
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Gemini API error (HTTP {}): {}", status, error_text);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("malformed response: could not parse Gemini reply")?;

        extract_summary(parsed)
    }
}
