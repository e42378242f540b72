//! List command implementation.

use super::open_service;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let service = open_service(&settings)?;
    let stats = service.stats();

    if stats.live_records == 0 {
        Output::info("Collection is empty. Use 'minne add' or 'minne load' to index content.");
        return Ok(());
    }

    Output::header(&format!("Collection '{}'", settings.store.collection));
    println!();
    Output::kv("Records", &stats.live_records.to_string());
    Output::kv(
        "Dimension",
        &stats
            .dimension
            .map(|d| d.to_string())
            .unwrap_or_else(|| "not established".to_string()),
    );
    Output::kv("Path", &service.path().display().to_string());

    Ok(())
}
