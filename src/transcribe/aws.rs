use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_transcribe::types::{Media, MediaFormat};
use aws_sdk_transcribe::Client as TranscribeClient;
use uuid::Uuid;

use super::processor::TranscriptionProcessor;
use super::{Transcriber, Transcript};
use crate::config::{AwsConfig, Config};
use crate::extractors::{AudioFormat, AudioHandle};
use crate::Result;

/// Transcription through AWS Transcribe, staging audio in S3
pub struct AwsTranscriber {
    aws: AwsConfig,
    language: Option<String>,
    s3_client: S3Client,
    transcribe_client: TranscribeClient,
}

impl AwsTranscriber {
    pub async fn new(config: &Config) -> Result<Self> {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(config.aws_region())
            .load()
            .await;

        Ok(Self {
            aws: config.aws.clone(),
            language: config.transcription.language.clone(),
            s3_client: S3Client::new(&aws_config),
            transcribe_client: TranscribeClient::new(&aws_config),
        })
    }

    fn object_key(&self, audio: &AudioHandle) -> String {
        format!(
            "{}audio_{}_{}.{}",
            self.aws.s3_key_prefix.as_deref().unwrap_or(""),
            Uuid::new_v4(),
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            audio.format.as_str()
        )
    }

    async fn upload_to_s3(&self, audio: &AudioHandle) -> Result<String> {
        let key = self.object_key(audio);

        tracing::info!("Uploading audio to S3: s3://{}/{}", self.aws.s3_bucket, key);

        let content = fs_err::read(&audio.path)?;

        self.s3_client
            .put_object()
            .bucket(&self.aws.s3_bucket)
            .key(&key)
            .body(content.into())
            .content_type(audio.format.mime_type())
            .send()
            .await
            .context("Failed to upload audio to S3")?;

        Ok(key)
    }

    async fn start_transcription_job(&self, s3_key: &str, audio: &AudioHandle) -> Result<String> {
        let job_name = format!("vidsum_{}", Uuid::new_v4());
        let media_uri = format!("s3://{}/{}", self.aws.s3_bucket, s3_key);

        tracing::info!("Starting transcription job: {}", job_name);

        let media = Media::builder().media_file_uri(media_uri).build();

        let mut job_builder = self
            .transcribe_client
            .start_transcription_job()
            .transcription_job_name(&job_name)
            .media_format(media_format(audio.format))
            .media(media);

        if let Some(lang) = &self.language {
            tracing::info!("Using specified language: {}", lang);
            job_builder = job_builder.language_code(lang.as_str().into());
        } else {
            tracing::info!("Using automatic language detection");
            job_builder = job_builder.identify_language(true);
        }

        job_builder
            .send()
            .await
            .context("Failed to start transcription job")?;

        Ok(job_name)
    }

    async fn cleanup_s3(&self, s3_key: &str) {
        tracing::debug!("Cleaning up S3 object: {}", s3_key);

        let deleted = self
            .s3_client
            .delete_object()
            .bucket(&self.aws.s3_bucket)
            .key(s3_key)
            .send()
            .await;

        if let Err(e) = deleted {
            tracing::warn!("Failed to clean up S3 object {}: {}", s3_key, e);
        }
    }
}

fn media_format(format: AudioFormat) -> MediaFormat {
    match format {
        AudioFormat::Mp3 => MediaFormat::Mp3,
        AudioFormat::M4a => MediaFormat::Mp4,
        AudioFormat::Wav => MediaFormat::Wav,
        AudioFormat::Flac => MediaFormat::Flac,
        AudioFormat::Ogg => MediaFormat::Ogg,
        AudioFormat::Webm => MediaFormat::Webm,
    }
}

#[async_trait]
impl Transcriber for AwsTranscriber {
    async fn transcribe(&self, audio: &AudioHandle, model_hint: &str) -> Result<Transcript> {
        tracing::debug!("AWS Transcribe has no model selection; ignoring hint {:?}", model_hint);

        let s3_key = self.upload_to_s3(audio).await?;

        let outcome = match self.start_transcription_job(&s3_key, audio).await {
            Ok(job_id) => {
                TranscriptionProcessor::new(self.transcribe_client.clone(), job_id)
                    .wait_for_completion()
                    .await
            }
            Err(e) => Err(e),
        };

        self.cleanup_s3(&s3_key).await;

        outcome
    }

    fn backend_name(&self) -> &'static str {
        "aws-transcribe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_format_mapping() {
        assert_eq!(media_format(AudioFormat::Mp3), MediaFormat::Mp3);
        assert_eq!(media_format(AudioFormat::M4a), MediaFormat::Mp4);
        assert_eq!(media_format(AudioFormat::Webm), MediaFormat::Webm);
    }
}
