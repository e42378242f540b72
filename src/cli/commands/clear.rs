//! Clear command implementation.

use super::{open_service, prompt_continue};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the clear command.
pub fn run_clear(force: bool, settings: Settings) -> Result<()> {
    if !force {
        let confirmed = prompt_continue(&format!(
            "Delete all indexed records in collection '{}'?",
            settings.store.collection
        ))?;
        if !confirmed {
            Output::info("Cancelled.");
            return Ok(());
        }
    }

    let service = open_service(&settings)?;
    service.clear()?;

    Output::success(&format!(
        "Cleared collection '{}'",
        settings.store.collection
    ));
    Ok(())
}
