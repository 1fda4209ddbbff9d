use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{scratch_file_name, AudioFormat, AudioHandle, MediaExtractor};
use crate::Result;

/// YouTube audio extractor using yt-dlp
pub struct YoutubeExtractor {
    yt_dlp_path: String,
}

impl YoutubeExtractor {
    pub fn new(yt_dlp_path: impl Into<String>) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Arguments that download the audio-only stream and convert it to mp3
    fn download_args(&self, url: &str, output_template: &Path) -> Vec<String> {
        vec![
            "--output".to_string(),
            output_template.to_string_lossy().into_owned(),
            // Audio-only stream, falling back to the smallest one on offer
            "--format".to_string(),
            "bestaudio[acodec^=mp4a]/bestaudio/worstaudio".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--no-playlist".to_string(),
            "--print".to_string(),
            "after_move:title".to_string(),
            "--no-simulate".to_string(),
            "--quiet".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl MediaExtractor for YoutubeExtractor {
    fn supports_url(&self, url: &str) -> bool {
        let url_lower = url.to_lowercase();
        url_lower.contains("youtube.com/watch")
            || url_lower.contains("youtu.be/")
            || url_lower.contains("youtube.com/embed/")
            || url_lower.contains("youtube.com/shorts/")
            || url_lower.contains("youtube.com/v/")
            || url_lower.contains("m.youtube.com/")
    }

    fn platform_name(&self) -> &'static str {
        "YouTube"
    }

    async fn fetch_audio(&self, url: &str, dest_dir: &Path) -> Result<AudioHandle> {
        if !self.check_availability().await {
            anyhow::bail!(
                "{} is not available. Please install it: https://github.com/yt-dlp/yt-dlp",
                self.yt_dlp_path
            );
        }

        // yt-dlp fills in the container extension, then the mp3 conversion renames the file
        let output_path = dest_dir.join(scratch_file_name(AudioFormat::Mp3));
        let template = output_path.with_extension("%(ext)s");
        tracing::debug!("Downloading audio for {} to {}", url, output_path.display());

        let output = Command::new(&self.yt_dlp_path)
            .args(self.download_args(url, &template))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to run yt-dlp")?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        if !output_path.exists() {
            anyhow::bail!("yt-dlp finished but produced no audio file");
        }

        let title = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);

        Ok(AudioHandle {
            path: output_path,
            format: AudioFormat::Mp3,
            title,
            source_url: url.to_string(),
        })
    }
}
