use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_summarizer::cli::{Cli, Commands};
use video_summarizer::config::Config;
use video_summarizer::extractors::ExtractorRegistry;
use video_summarizer::summarize::GeminiClient;
use video_summarizer::{output, transcribe, utils, SummaryPipeline, SummaryRequest};

fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose {
        "video_summarizer=debug,vidsum=debug"
    } else {
        "video_summarizer=info,vidsum=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Summarize {
            url,
            paragraphs,
            max_chars,
            model,
            api_key,
            format,
            output,
            show_transcript,
        } => {
            // Command-line values are checked before touching config, tools or network
            let mut request = SummaryRequest::new(
                url,
                paragraphs.unwrap_or(1),
                max_chars.unwrap_or(100),
            );
            request.model_hint = model;
            request.validate()?;

            let config = Config::load().await?;
            request.paragraph_count = paragraphs.unwrap_or(config.app.default_paragraphs);
            request.max_characters = max_chars.unwrap_or(config.app.default_max_characters);

            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .context("Gemini API key not provided; pass --api-key or set GEMINI_PRO_API_KEY")?;

            let missing_deps = utils::check_dependencies(&config).await;
            if !missing_deps.is_empty() {
                eprintln!("⚠️  Dependency check warnings:");
                for dep in missing_deps {
                    eprintln!("   • {}", dep);
                }
                eprintln!("   (Continuing anyway - tools may be available)");
            }

            let audio_source = ExtractorRegistry::new(&config.acquisition)?;
            let transcriber = transcribe::build_transcriber(&config).await?;
            let summarizer = GeminiClient::from_config(api_key, &config.summarization);

            let pipeline = SummaryPipeline::new(Box::new(audio_source), transcriber, Box::new(summarizer))
                .with_default_model_hint(config.transcription.default_model.clone())
                .with_progress(config.app.show_progress && !cli.quiet);

            tracing::info!("Starting summary for URL: {}", request.source_url);

            let result = match pipeline.run(&request).await {
                Ok(result) => result,
                // The message already carries the cause chain
                Err(e) => anyhow::bail!("{}", e),
            };

            output::print_to_console(&result, format, show_transcript)?;

            if let Some(path) = output {
                output::save_summary(&result.summary_text, &path)?;
                println!("Summary saved to: {}", path.display());
            }
        }
        Commands::Config { show } => {
            let config = Config::load().await?;
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                println!("  {}", Config::config_path()?.display());
            }
        }
        Commands::Platforms => {
            println!("Supported platforms:");
            println!("  • YouTube (youtube.com, youtu.be, shorts)");
            println!("  • Direct audio/video URLs (mp3, m4a, wav, flac, ogg, opus, mp4, webm)");
        }
    }

    Ok(())
}
