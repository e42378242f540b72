//! Init command - first-run setup.

use super::prompt_continue;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use console::style;

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Minne Setup");
    println!();
    println!("Welcome to Minne! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API configuration
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    match preflight::check_credentials(settings) {
        Ok(()) => Output::success("Provider credentials are configured!"),
        Err(_) => {
            Output::warning("No provider credentials found.");
            println!();
            println!("  Minne needs an OpenAI-compatible endpoint for embeddings and answers.");
            println!(
                "  Either set an API key: {}",
                style("export OPENAI_API_KEY='sk-...'").green()
            );
            println!(
                "  or point it at a self-hosted endpoint: {}",
                style("export OPENAI_API_BASE='http://localhost:8080/v1'").green()
            );
        }
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 3: Create config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("minne config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Index the built-in demo corpus", style("minne add --sample").cyan());
    println!("  {} Index your own files", style("minne load <path>").cyan());
    println!("  {} Search the collection", style("minne search \"<query>\"").cyan());
    println!("  {} Ask a question", style("minne ask \"<question>\"").cyan());
    println!();
    println!("For more help: {}", style("minne --help").cyan());

    Ok(())
}
