//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            apply_setting(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
            Output::info(&format!(
                "Saved to {}",
                Settings::default_config_path().display()
            ));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a `section.key` assignment to the settings.
fn apply_setting(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "store.collection" => settings.store.collection = value.to_string(),
        "embedding.model" => settings.embedding.model = value.to_string(),
        "embedding.dimensions" => settings.embedding.dimensions = value.parse()?,
        "embedding.api_base" => settings.embedding.api_base = Some(value.to_string()),
        "chunking.chunk_size" => settings.chunking.chunk_size = value.parse()?,
        "chunking.chunk_overlap" => settings.chunking.chunk_overlap = value.parse()?,
        "rag.model" => settings.rag.model = value.to_string(),
        "rag.max_context_chunks" => settings.rag.max_context_chunks = value.parse()?,
        "rag.temperature" => settings.rag.temperature = value.parse()?,
        "rag.max_tokens" => settings.rag.max_tokens = value.parse()?,
        "rag.api_base" => settings.rag.api_base = Some(value.to_string()),
        "rag.timeout_seconds" => settings.rag.timeout_seconds = value.parse()?,
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown configuration key '{}'. Run 'minne config show' to see available keys.",
                key
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_setting_known_keys() {
        let mut settings = Settings::default();
        apply_setting(&mut settings, "rag.model", "gpt-4o").unwrap();
        assert_eq!(settings.rag.model, "gpt-4o");

        apply_setting(&mut settings, "chunking.chunk_size", "512").unwrap();
        assert_eq!(settings.chunking.chunk_size, 512);
    }

    #[test]
    fn test_apply_setting_unknown_key() {
        let mut settings = Settings::default();
        assert!(apply_setting(&mut settings, "nope.nothing", "x").is_err());
    }

    #[test]
    fn test_apply_setting_bad_number() {
        let mut settings = Settings::default();
        assert!(apply_setting(&mut settings, "embedding.dimensions", "lots").is_err());
    }
}
