//! CLI command implementations.

mod add;
mod ask;
mod clear;
mod config;
mod init;
mod list;
mod load;
mod search;
mod test_llm;

pub use add::run_add;
pub use ask::run_ask;
pub use clear::run_clear;
pub use config::run_config;
pub use init::run_init;
pub use list::run_list;
pub use load::run_load;
pub use search::run_search;
pub use test_llm::run_test_llm;

use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::llm::ChatClient;
use crate::retrieval::RetrievalService;
use console::style;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/// Build the configured embedding provider.
pub(crate) fn build_embedder(settings: &Settings) -> Arc<dyn Embedder> {
    Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
        settings.embedding.api_base.as_deref(),
    ))
}

/// Open the configured collection, loading its snapshot if present.
pub(crate) fn open_service(settings: &Settings) -> crate::error::Result<Arc<RetrievalService>> {
    let embedder = build_embedder(settings);
    Ok(Arc::new(RetrievalService::open(
        settings.collection_path(),
        embedder,
    )?))
}

/// Build the configured chat client, with an optional model override.
pub(crate) fn build_chat(settings: &Settings, model: Option<String>) -> ChatClient {
    let model = model.unwrap_or_else(|| settings.rag.model.clone());
    ChatClient::new(
        &model,
        settings.rag.api_base.as_deref(),
        Duration::from_secs(settings.rag.timeout_seconds),
    )
    .with_temperature(settings.rag.temperature)
    .with_max_tokens(settings.rag.max_tokens)
}

/// Prompt user for yes/no confirmation.
pub(crate) fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
