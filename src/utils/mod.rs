use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use url::Url;

use crate::config::{Config, TranscriptionBackend};
use crate::ValidationError;

/// Validate a media locator: non-empty, absolute, http or https
pub fn validate_source_url(url: &str) -> Result<Url, ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("source_url", "must not be empty"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| {
        ValidationError::new("source_url", format!("not a well-formed URL ({}): {}", e, trimmed))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::new(
            "source_url",
            format!("must use HTTP or HTTPS, got {}", parsed.scheme()),
        ));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::new("source_url", "has no host"));
    }

    Ok(parsed)
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else if total_seconds > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Spinner for a running stage; hidden when progress display is off
pub fn stage_spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}

/// Report external tools the configured backends need but cannot be found
pub async fn check_dependencies(config: &Config) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(&config.acquisition.yt_dlp_path).await {
        missing.push(format!(
            "{} - required for YouTube extraction",
            config.acquisition.yt_dlp_path
        ));
    }

    if !check_command_available("ffmpeg").await {
        missing.push("ffmpeg - required to convert downloaded audio".to_string());
    }

    if config.transcription.backend == TranscriptionBackend::Whisper
        && !check_command_available(&config.transcription.whisper_path).await
    {
        missing.push(format!(
            "{} - required for local transcription (pip install openai-whisper)",
            config.transcription.whisper_path
        ));
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    // whisper has no --version flag, --help works for every tool we probe
    Command::new(command)
        .arg("--help")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m 1s");
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("https://www.youtube.com/watch?v=123").is_ok());
        assert!(validate_source_url("  http://example.com/a.mp3 ").is_ok());

        let err = validate_source_url("").unwrap_err();
        assert_eq!(err.field, "source_url");
        assert!(err.reason.contains("empty"));

        assert!(validate_source_url("ftp://example.com/a.mp3").is_err());
        assert!(validate_source_url("not-a-url").is_err());
        assert!(validate_source_url("https://").is_err());
    }

    #[test]
    fn test_hidden_spinner() {
        let spinner = stage_spinner("working", false);
        assert!(spinner.is_hidden());
        spinner.finish_and_clear();
    }

    #[tokio::test]
    async fn test_missing_command_detected() {
        assert!(!check_command_available("surely-not-installed-anywhere").await);
    }
}
