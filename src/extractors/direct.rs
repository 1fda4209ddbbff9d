use anyhow::Context;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::io::Write;
use std::path::Path;
use url::Url;

use super::{scratch_file_name, AudioFormat, AudioHandle, MediaExtractor};
use crate::Result;

const MEDIA_EXTENSIONS: &[&str] = &[
    ".mp3", ".m4a", ".wav", ".flac", ".ogg", ".opus", ".aac", ".mp4", ".m4v", ".webm",
];

/// Direct URL extractor for audio and video files
pub struct DirectExtractor {
    client: Client,
}

impl DirectExtractor {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Determine audio format from URL or content type
    fn determine_format(&self, url: &str, content_type: Option<&str>) -> AudioFormat {
        let from_url = Url::parse(url)
            .ok()
            .and_then(|parsed| {
                parsed
                    .path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
            })
            .and_then(|filename| {
                Path::new(&filename)
                    .extension()
                    .and_then(|ext| AudioFormat::from_extension(&ext.to_string_lossy()))
            });

        if let Some(format) = from_url {
            return format;
        }

        match content_type {
            Some(ct) if ct.contains("mp3") || ct.contains("mpeg") => AudioFormat::Mp3,
            Some(ct) if ct.contains("mp4") || ct.contains("m4a") => AudioFormat::M4a,
            Some(ct) if ct.contains("wav") => AudioFormat::Wav,
            Some(ct) if ct.contains("flac") => AudioFormat::Flac,
            Some(ct) if ct.contains("ogg") => AudioFormat::Ogg,
            Some(ct) if ct.contains("webm") => AudioFormat::Webm,
            _ => AudioFormat::Mp3,
        }
    }

    /// Title from the decoded file name, separators turned into spaces
    fn title_from_url(url: &Url) -> Option<String> {
        url.path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|filename| !filename.is_empty())
            .map(|filename| {
                let name = match filename.rfind('.') {
                    Some(dot_pos) => &filename[..dot_pos],
                    None => filename,
                };
                urlencoding::decode(name)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| name.to_string())
                    .replace(['_', '-'], " ")
            })
    }
}

#[async_trait]
impl MediaExtractor for DirectExtractor {
    fn supports_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        let path = parsed.path().to_lowercase();
        MEDIA_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
    }

    fn platform_name(&self) -> &'static str {
        "Direct URL"
    }

    async fn fetch_audio(&self, url: &str, dest_dir: &Path) -> Result<AudioHandle> {
        let parsed = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .context("Failed to request media")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download audio: HTTP {}", response.status());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.to_string());

        let format = self.determine_format(url, content_type.as_deref());
        let audio_path = dest_dir.join(scratch_file_name(format));

        tracing::debug!("Downloading {} to {}", url, audio_path.display());

        let mut file = fs_err::File::create(&audio_path)?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Download interrupted")?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
        }

        if downloaded == 0 {
            anyhow::bail!("Downloaded file is empty: {}", url);
        }

        tracing::debug!("Downloaded {} bytes", downloaded);

        Ok(AudioHandle {
            path: audio_path,
            format,
            title: Self::title_from_url(&parsed),
            source_url: url.to_string(),
        })
    }
}

impl Default for DirectExtractor {
    fn default() -> Self {
        Self::new()
    }
}
