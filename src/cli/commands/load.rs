//! Load command implementation.

use super::open_service;
use crate::chunking::TextSplitter;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::documents;
use crate::store::Metadata;
use anyhow::Result;

/// Run the load command.
pub async fn run_load(
    path: &str,
    extensions: &[String],
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check_credentials(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let path = Settings::expand_path(path);
    Output::info(&format!("Loading documents from {}", path.display()));

    let docs = documents::load_path(&path, extensions)?;
    if docs.is_empty() {
        Output::warning("No documents found.");
        return Ok(());
    }
    Output::info(&format!("Loaded {} documents", docs.len()));

    let splitter = TextSplitter::new(
        chunk_size.unwrap_or(settings.chunking.chunk_size),
        chunk_overlap.unwrap_or(settings.chunking.chunk_overlap),
    );

    let mut texts: Vec<String> = Vec::new();
    let mut metadatas: Vec<Metadata> = Vec::new();
    for doc in docs {
        for (i, chunk) in splitter.split(&doc.text).into_iter().enumerate() {
            let mut metadata = doc.metadata.clone();
            metadata.insert("chunk".to_string(), i.into());
            texts.push(chunk);
            metadatas.push(metadata);
        }
    }

    if texts.is_empty() {
        Output::warning("Documents contained no indexable text.");
        return Ok(());
    }
    Output::info(&format!("Split into {} chunks", texts.len()));

    let service = open_service(&settings)?;

    let spinner = Output::spinner("Embedding and indexing...");
    let result = service.index(texts, metadatas).await;
    spinner.finish_and_clear();

    match result {
        Ok(ids) => {
            Output::success(&format!(
                "Indexed {} chunks into collection '{}'",
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
