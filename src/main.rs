//! Ideacrew CLI entry point.

use anyhow::Result;
use clap::Parser;
use ideacrew::cli::commands::{self, RunOptions};
use ideacrew::cli::{Cli, Commands};
use ideacrew::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ideacrew={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let config_path = cli
        .config
        .as_deref()
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    match cli.command {
        Commands::Run {
            comments,
            video,
            max_comments,
            output,
            format,
            model,
            show_stages,
        } => {
            let options = RunOptions {
                comments,
                video,
                max_comments,
                output,
                format,
                model,
                show_stages,
            };
            commands::run_pipeline(options, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Prompts { action } => {
            commands::run_prompts(&action, &settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, &config_path)?;
        }
    }

    Ok(())
}
