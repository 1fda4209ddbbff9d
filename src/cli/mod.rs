use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vidsum",
    about = "Video Summarizer - Summarize YouTube videos and media files from their audio track",
    version,
    long_about = "Downloads the audio track of a video, transcribes it, and asks Gemini for a summary constrained to a paragraph target and character cap. Also reports word count, reading time and the most frequent words of the transcript."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize the audio of a video URL
    Summarize {
        /// Video URL (YouTube) or direct media URL
        #[arg(value_name = "URL")]
        url: String,

        /// Number of paragraphs in the summary (config default if not specified)
        #[arg(short, long, value_name = "COUNT")]
        paragraphs: Option<u32>,

        /// Maximum number of characters in the summary (config default if not specified)
        #[arg(short = 'c', long, value_name = "CHARS")]
        max_chars: Option<u32>,

        /// Speech model profile for transcription, e.g. tiny, base, small, medium, large
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Gemini API key
        #[arg(long, env = "GEMINI_PRO_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Output format for the console
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also write the summary text to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include the full transcript in the console output
        #[arg(long)]
        show_transcript: bool,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List supported platforms
    Platforms,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON document with summary, transcript and metrics
    Json,
    /// Markdown sections
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
