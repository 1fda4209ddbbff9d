use anyhow::{Context, Result};
use aws_types::region::Region;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::summarize::validate_length_hints;
use crate::transcribe::DEFAULT_MODEL_HINT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audio download settings
    pub acquisition: AcquisitionConfig,

    /// Speech-to-text settings
    pub transcription: TranscriptionConfig,

    /// Summarizer settings
    pub summarization: SummarizationConfig,

    /// AWS settings, used by the `aws` transcription backend
    pub aws: AwsConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// yt-dlp executable
    pub yt_dlp_path: String,

    /// Base directory for downloads (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionBackend {
    Whisper,
    Aws,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Which backend transcribes the audio
    pub backend: TranscriptionBackend,

    /// Model profile passed when the caller does not choose one
    pub default_model: String,

    /// whisper executable
    pub whisper_path: String,

    /// Spoken language (auto-detect if not specified)
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationConfig {
    /// Gemini model name
    pub model: String,

    /// Base URL of the Generative Language API
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// AWS region
    pub region: String,

    /// S3 bucket for temporary audio storage
    pub s3_bucket: String,

    /// Optional S3 key prefix
    pub s3_key_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Paragraph target when none is given on the command line
    pub default_paragraphs: u32,

    /// Character cap when none is given on the command line
    pub default_max_characters: u32,

    /// Show spinners while stages run
    pub show_progress: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            temp_dir: None,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            backend: TranscriptionBackend::Whisper,
            default_model: DEFAULT_MODEL_HINT.to_string(),
            whisper_path: "whisper".to_string(),
            language: None,
        }
    }
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            s3_bucket: "".to_string(),
            s3_key_prefix: Some("vidsum/".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_paragraphs: 3,
            default_max_characters: 500,
            show_progress: true,
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
            Ok(config)
        }
    }

    /// Load and validate a configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("video-summarizer").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.transcription.backend == TranscriptionBackend::Aws && self.aws.s3_bucket.is_empty() {
            anyhow::bail!("AWS S3 bucket must be configured for the aws transcription backend");
        }

        if self.transcription.default_model.trim().is_empty() {
            anyhow::bail!("transcription.default_model must not be empty");
        }

        if self.summarization.model.trim().is_empty() {
            anyhow::bail!("summarization.model must not be empty");
        }

        url::Url::parse(&self.summarization.endpoint)
            .with_context(|| format!("Invalid summarization.endpoint: {}", self.summarization.endpoint))?;

        validate_length_hints(self.app.default_paragraphs, self.app.default_max_characters)
            .context("Invalid app defaults")?;

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Transcription Backend: {:?}", self.transcription.backend);
        println!("  Default Model: {}", self.transcription.default_model);
        if let Some(language) = &self.transcription.language {
            println!("  Language: {}", language);
        }
        println!("  Summarization Model: {}", self.summarization.model);
        println!("  Default Paragraphs: {}", self.app.default_paragraphs);
        println!("  Default Max Characters: {}", self.app.default_max_characters);
        if self.transcription.backend == TranscriptionBackend::Aws {
            println!("  AWS Region: {}", self.aws.region);
            println!("  S3 Bucket: {}", self.aws.s3_bucket);
            if let Some(prefix) = &self.aws.s3_key_prefix {
                println!("  S3 Prefix: {}", prefix);
            }
        }
    }

    /// Get AWS region
    pub fn aws_region(&self) -> Region {
        Region::new(self.aws.region.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.transcription.backend, TranscriptionBackend::Whisper);
        assert_eq!(config.transcription.default_model, "base");
        assert_eq!(config.app.default_paragraphs, 3);
        assert_eq!(config.app.default_max_characters, 500);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "transcription:\n  backend: whisper\n  default_model: small\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.transcription.default_model, "small");
        assert_eq!(config.transcription.whisper_path, "whisper");
        assert_eq!(config.summarization.model, "gemini-1.5-pro");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_aws_backend_requires_bucket() {
        let mut config = Config::default();
        config.transcription.backend = TranscriptionBackend::Aws;
        assert!(config.validate().is_err());

        config.aws.s3_bucket = "my-bucket".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_defaults_rejected() {
        let mut config = Config::default();
        config.app.default_max_characters = 20;
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("max_characters"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.transcription.language = Some("en".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.transcription.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "transcription: [not, a, map]").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
