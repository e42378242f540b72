//! Search command implementation.

use super::open_service;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    // The query itself gets embedded, so credentials are needed up front.
    if let Err(e) = preflight::check_credentials(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let service = open_service(&settings)?;

    let spinner = Output::spinner("Searching...");
    let results = service.retrieve(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) => {
            if chunks.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", chunks.len()));

                for chunk in &chunks {
                    Output::search_result(chunk.source(), chunk.score, &chunk.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
