//! Minne CLI entry point.

use anyhow::Result;
use clap::Parser;
use minne::cli::{commands, Cli, Commands};
use minne::config::Settings;
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
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("minne={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    if let Some(collection) = &cli.collection {
        settings.store.collection = collection.clone();
    }

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Add {
            text,
            sample,
            source,
        } => {
            commands::run_add(text.clone(), *sample, source, settings).await?;
        }

        Commands::Load {
            path,
            extensions,
            chunk_size,
            chunk_overlap,
        } => {
            commands::run_load(path, extensions, *chunk_size, *chunk_overlap, settings).await?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(query, *limit, settings).await?;
        }

        Commands::Ask {
            question,
            model,
            max_chunks,
        } => {
            commands::run_ask(question, model.clone(), *max_chunks, settings).await?;
        }

        Commands::List => {
            commands::run_list(settings)?;
        }

        Commands::Clear { force } => {
            commands::run_clear(*force, settings)?;
        }

        Commands::TestLlm => {
            commands::run_test_llm(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
