use anyhow::{Context, Result};
use aws_sdk_transcribe::types::{TranscriptionJob, TranscriptionJobStatus};
use aws_sdk_transcribe::Client as TranscribeClient;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use super::Transcript;

/// AWS Transcribe transcript document
#[derive(Debug, Deserialize)]
struct AwsTranscript {
    results: TranscriptResults,
}

#[derive(Debug, Deserialize)]
struct TranscriptResults {
    transcripts: Vec<TranscriptText>,
}

#[derive(Debug, Deserialize)]
struct TranscriptText {
    transcript: String,
}

/// Polls a transcription job until it finishes, logging each check at debug
pub struct TranscriptionProcessor {
    client: TranscribeClient,
    job_id: String,
}

impl TranscriptionProcessor {
    pub fn new(client: TranscribeClient, job_id: String) -> Self {
        Self { client, job_id }
    }

    /// Wait for the job to complete and fetch its transcript
    pub async fn wait_for_completion(&self) -> Result<Transcript> {
        let start_time = std::time::Instant::now();
        let mut check_count = 0;

        let job = loop {
            check_count += 1;

            let job = self.get_transcription_job().await?;

            match job.transcription_job_status() {
                Some(TranscriptionJobStatus::InProgress) | Some(TranscriptionJobStatus::Queued) => {
                    tracing::debug!(
                        job = %self.job_id,
                        "{}",
                        poll_status_message(start_time.elapsed().as_secs(), check_count)
                    );

                    sleep(poll_interval(check_count)).await;
                }
                Some(TranscriptionJobStatus::Completed) => break job,
                Some(TranscriptionJobStatus::Failed) => {
                    let failure_reason = job.failure_reason().unwrap_or("Unknown error");
                    anyhow::bail!("Transcription job failed: {}", failure_reason);
                }
                _ => anyhow::bail!("Unexpected transcription job status"),
            }
        };

        tracing::debug!(
            job = %self.job_id,
            elapsed_secs = start_time.elapsed().as_secs(),
            "Transcription job completed"
        );

        let transcript_uri = job
            .transcript()
            .and_then(|t| t.transcript_file_uri())
            .ok_or_else(|| anyhow::anyhow!("No transcript URI found"))?;

        let transcript_json = self.download_transcript(transcript_uri).await?;
        parse_transcript(&transcript_json)
    }

    async fn get_transcription_job(&self) -> Result<TranscriptionJob> {
        let response = self
            .client
            .get_transcription_job()
            .transcription_job_name(&self.job_id)
            .send()
            .await
            .context("Failed to get transcription job status")?;

        response
            .transcription_job()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Transcription job not found"))
    }

    async fn download_transcript(&self, uri: &str) -> Result<String> {
        let response = reqwest::get(uri)
            .await
            .context("Failed to download transcript")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download transcript: HTTP {}", response.status());
        }

        response
            .text()
            .await
            .context("Failed to read transcript content")
    }
}

/// Wait grows by two seconds per check, capped at 30
fn poll_interval(check_count: u64) -> Duration {
    Duration::from_secs(std::cmp::min(5 + (check_count - 1) * 2, 30))
}

fn poll_status_message(elapsed_secs: u64, check_count: u64) -> String {
    format!(
        "Job still running ({}s elapsed, check #{})",
        elapsed_secs, check_count
    )
}

fn parse_transcript(json: &str) -> Result<Transcript> {
    let aws_transcript: AwsTranscript =
        serde_json::from_str(json).context("Failed to parse transcript JSON")?;

    let text = aws_transcript
        .results
        .transcripts
        .into_iter()
        .map(|t| t.transcript)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Transcript::new(text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_backoff() {
        assert_eq!(poll_interval(1), Duration::from_secs(5));
        assert_eq!(poll_interval(2), Duration::from_secs(7));
        assert_eq!(poll_interval(50), Duration::from_secs(30));
    }

    #[test]
    fn test_poll_status_message() {
        assert_eq!(
            poll_status_message(12, 3),
            "Job still running (12s elapsed, check #3)"
        );
    }

    #[test]
    fn test_parse_transcript() {
        let json = r#"{
            "jobName": "vidsum_1",
            "accountId": "123",
            "status": "COMPLETED",
            "results": {
                "transcripts": [{"transcript": "Welcome to the show."}],
                "items": []
            }
        }"#;
        assert_eq!(parse_transcript(json).unwrap().text, "Welcome to the show.");
    }

    #[test]
    fn test_parse_transcript_without_speech() {
        let json = r#"{"results": {"transcripts": []}}"#;
        assert!(parse_transcript(json).unwrap().is_empty());
    }
}
