//! tubesum CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubesum::cli::{commands, log_filter, Cli, Commands};
use tubesum::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may live in a local .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(std::path::PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            log_filter(cli.verbose, &settings.general.log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.temp_dir())?;

    // Execute command
    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Transcript {
            url,
            language,
            audio_fallback,
            output,
            json,
        } => {
            commands::run_transcript(url, *language, *audio_fallback, output.clone(), *json, settings)
                .await?;
        }

        Commands::Summarize {
            url,
            language,
            speak,
        } => {
            commands::run_summarize(url, *language, speak.clone(), settings).await?;
        }

        Commands::Ask {
            url,
            question,
            language,
            speak,
        } => {
            commands::run_ask(url, question, *language, speak.clone(), settings).await?;
        }

        Commands::Speak { text, output, html } => {
            commands::run_speak(text, output, *html, settings).await?;
        }

        Commands::Listen { url, output } => {
            commands::run_listen(url, output.clone(), settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
