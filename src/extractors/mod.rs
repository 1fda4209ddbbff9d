use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod direct;
pub mod youtube;

use crate::config::AcquisitionConfig;
use crate::Result;

/// Locally stored audio produced by acquisition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioHandle {
    /// Path of the downloaded audio file
    pub path: PathBuf,

    /// Audio container format
    pub format: AudioFormat,

    /// Title of the media, when the source exposes one
    pub title: Option<String>,

    /// URL the audio was acquired from
    pub source_url: String,
}

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Wav,
    Flac,
    Ogg,
    Webm,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Webm => "webm",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "m4a" | "aac" | "mp4" | "m4v" => Some(AudioFormat::M4a),
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "ogg" | "oga" | "opus" => Some(AudioFormat::Ogg),
            "webm" => Some(AudioFormat::Webm),
            _ => None,
        }
    }

    /// Get MIME type for the format
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Webm => "audio/webm",
        }
    }
}

/// Audio acquisition as seen by the summary pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Fetch the audio track behind `source_url` into a local file
    async fn acquire(&self, source_url: &str) -> Result<AudioHandle>;
}

/// Trait for fetching audio from one kind of source
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Check if this extractor supports the given URL
    fn supports_url(&self, url: &str) -> bool;

    /// Get the name of this platform
    fn platform_name(&self) -> &'static str;

    /// Download the audio-only stream of `url` into `dest_dir`
    async fn fetch_audio(&self, url: &str, dest_dir: &Path) -> Result<AudioHandle>;
}

/// Registry for managing multiple extractors.
///
/// Downloads land in a scratch directory that is removed when the registry is dropped.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn MediaExtractor>>,
    scratch_dir: TempDir,
}

impl ExtractorRegistry {
    /// Create a registry with the default extractors
    pub fn new(config: &AcquisitionConfig) -> Result<Self> {
        let scratch_dir = match &config.temp_dir {
            Some(base) => {
                fs_err::create_dir_all(base)?;
                TempDir::new_in(base)
            }
            None => TempDir::new(),
        }
        .context("Failed to create temporary directory")?;

        let mut registry = Self {
            extractors: Vec::new(),
            scratch_dir,
        };

        registry.register(Box::new(youtube::YoutubeExtractor::new(
            config.yt_dlp_path.clone(),
        )));
        registry.register(Box::new(direct::DirectExtractor::new()));

        Ok(registry)
    }

    /// Register a new extractor
    pub fn register(&mut self, extractor: Box<dyn MediaExtractor>) {
        self.extractors.push(extractor);
    }

    /// Find an extractor that supports the given URL
    pub fn find_extractor(&self, url: &str) -> Option<&dyn MediaExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.supports_url(url))
            .map(|boxed| boxed.as_ref())
    }

    /// List all supported platforms
    pub fn list_platforms(&self) -> Vec<&'static str> {
        self.extractors
            .iter()
            .map(|extractor| extractor.platform_name())
            .collect()
    }

    /// Directory downloads are written to
    pub fn scratch_dir(&self) -> &Path {
        self.scratch_dir.path()
    }
}

#[async_trait]
impl AudioSource for ExtractorRegistry {
    async fn acquire(&self, source_url: &str) -> Result<AudioHandle> {
        let extractor = self
            .find_extractor(source_url)
            .ok_or_else(|| anyhow::anyhow!("No extractor found for URL: {}", source_url))?;

        tracing::info!(
            "Fetching audio from {} via {}",
            source_url,
            extractor.platform_name()
        );

        extractor.fetch_audio(source_url, self.scratch_dir()).await
    }
}

/// Unique file name for a download in the scratch directory
pub(crate) fn scratch_file_name(format: AudioFormat) -> String {
    format!(
        "audio_{}.{}",
        &uuid::Uuid::new_v4().to_string()[..8],
        format.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ExtractorRegistry {
        ExtractorRegistry::new(&AcquisitionConfig::default()).unwrap()
    }

    #[test]
    fn test_audio_format_from_extension() {
        assert_eq!(AudioFormat::from_extension("MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("aac"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_extension("opus"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_find_extractor() {
        let registry = registry();
        assert_eq!(
            registry
                .find_extractor("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
                .map(|e| e.platform_name()),
            Some("YouTube")
        );
        assert_eq!(
            registry
                .find_extractor("https://cdn.example.com/talk.mp3")
                .map(|e| e.platform_name()),
            Some("Direct URL")
        );
        assert!(registry.find_extractor("https://example.com/page").is_none());
    }

    #[test]
    fn test_list_platforms() {
        assert_eq!(registry().list_platforms(), vec!["YouTube", "Direct URL"]);
    }

    #[tokio::test]
    async fn test_acquire_unsupported_url() {
        let err = registry().acquire("https://example.com/page").await.unwrap_err();
        assert!(err.to_string().contains("No extractor found"));
    }

    #[test]
    fn test_scratch_dir_is_removed_on_drop() {
        let registry = registry();
        let dir = registry.scratch_dir().to_path_buf();
        assert!(dir.exists());
        drop(registry);
        assert!(!dir.exists());
    }

    #[test]
    fn test_scratch_file_name() {
        let name = scratch_file_name(AudioFormat::Webm);
        assert!(name.starts_with("audio_"));
        assert!(name.ends_with(".webm"));
    }
}
