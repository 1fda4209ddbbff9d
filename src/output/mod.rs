use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::SummaryResult;

/// Render a result for the console
pub fn render(result: &SummaryResult, format: OutputFormat, show_transcript: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_as_text(result, show_transcript)),
        OutputFormat::Json => format_as_json(result),
        OutputFormat::Markdown => Ok(format_as_markdown(result, show_transcript)),
    }
}

/// Print a result to stdout
pub fn print_to_console(result: &SummaryResult, format: OutputFormat, show_transcript: bool) -> Result<()> {
    println!("{}", render(result, format, show_transcript)?);
    Ok(())
}

/// Export the summary text on its own
pub fn save_summary(summary_text: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, summary_text).context("Failed to write summary file")?;
    Ok(())
}

fn metric_lines(result: &SummaryResult) -> [String; 3] {
    let analytics = &result.analytics;
    [
        format!("Word Count: {}", analytics.word_count),
        format!("Reading Time: {} minute(s)", analytics.reading_time_minutes),
        format!("Key Phrases: {}", analytics.key_phrases.join(", ")),
    ]
}

fn format_as_text(result: &SummaryResult, show_transcript: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style("Summary").bold().underlined()));
    out.push_str(result.summary_text.trim());
    out.push_str("\n\n");

    if show_transcript {
        out.push_str(&format!("{}\n", style("Transcript").bold().underlined()));
        out.push_str(result.transcript.text.trim());
        out.push_str("\n\n");
    }

    out.push_str(&format!("{}\n", style("Additional Metrics").bold().underlined()));
    out.push_str(&metric_lines(result).join("\n"));

    out
}

fn format_as_markdown(result: &SummaryResult, show_transcript: bool) -> String {
    let mut out = String::from("## Summary\n\n");
    out.push_str(result.summary_text.trim());
    out.push_str("\n\n");

    if show_transcript {
        out.push_str("## Transcript\n\n");
        out.push_str(result.transcript.text.trim());
        out.push_str("\n\n");
    }

    out.push_str("## Additional Metrics\n\n");
    for line in metric_lines(result) {
        out.push_str(&format!("- {}\n", line));
    }

    out
}

fn format_as_json(result: &SummaryResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::calculate_metrics;
    use crate::transcribe::Transcript;

    fn sample() -> SummaryResult {
        let text = "the cat sat on the mat the cat ran";
        SummaryResult {
            summary_text: "A cat sat on a mat.\n\nThen it ran.".to_string(),
            transcript: Transcript::new(text),
            analytics: calculate_metrics(text),
        }
    }

    #[test]
    fn test_text_output_sections() {
        console::set_colors_enabled(false);
        let text = render(&sample(), OutputFormat::Text, false).unwrap();
        assert!(text.starts_with("Summary\nA cat sat on a mat."));
        assert!(!text.contains("Transcript"));
        assert!(text.contains("Word Count: 9"));
        assert!(text.contains("Reading Time: 1 minute(s)"));
        assert!(text.contains("Key Phrases: the, cat, sat, on, mat, ran"));
    }

    #[test]
    fn test_text_output_with_transcript() {
        console::set_colors_enabled(false);
        let text = render(&sample(), OutputFormat::Text, true).unwrap();
        assert!(text.contains("Transcript\nthe cat sat on the mat the cat ran"));
    }

    #[test]
    fn test_markdown_output() {
        let md = render(&sample(), OutputFormat::Markdown, true).unwrap();
        assert!(md.starts_with("## Summary\n\n"));
        assert!(md.contains("## Transcript\n\n"));
        assert!(md.contains("- Reading Time: 1 minute(s)\n"));
    }

    #[test]
    fn test_json_output() {
        let json = render(&sample(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["analytics"]["word_count"], 9);
        assert_eq!(value["analytics"]["key_phrases"][0], "the");
        assert_eq!(value["transcript"]["text"], "the cat sat on the mat the cat ran");
    }

    #[test]
    fn test_save_summary_writes_only_summary() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("summary.txt");
        save_summary("Short summary.", &path).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "Short summary.");
    }
}
