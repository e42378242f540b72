//! Add command implementation.

use super::open_service;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::sample::sample_documents;
use crate::store::Metadata;
use anyhow::Result;

/// Run the add command.
pub async fn run_add(
    text: Option<String>,
    sample: bool,
    source: &str,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check_credentials(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let (texts, metadatas): (Vec<String>, Vec<Metadata>) = if sample {
        let docs = sample_documents();
        Output::info(&format!("Loading {} sample documents...", docs.len()));
        docs.into_iter().map(|d| (d.text, d.metadata)).unzip()
    } else if let Some(text) = text {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), source.into());
        (vec![text], vec![metadata])
    } else {
        Output::error("Provide text to add, or pass --sample for the built-in corpus.");
        return Err(anyhow::anyhow!("no input provided"));
    };

    let service = open_service(&settings)?;

    let spinner = Output::spinner("Embedding and indexing...");
    let result = service.index(texts, metadatas).await;
    spinner.finish_and_clear();

    match result {
        Ok(ids) => {
            Output::success(&format!(
                "Indexed {} documents into collection '{}'",
                ids.len(),
                settings.store.collection
            ));
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
