//! Ask command implementation.

use super::{build_chat, open_service};
use crate::cli::{preflight, Output};
use crate::config::{Prompts, Settings};
use crate::retrieval::RagEngine;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    max_chunks: Option<usize>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check_credentials(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let service = open_service(&settings)?;
    let chat = build_chat(&settings, model);
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let engine = RagEngine::new(
        service,
        chat,
        max_chunks.unwrap_or(settings.rag.max_context_chunks as usize),
    )
    .with_prompts(prompts);

    let spinner = Output::spinner("Searching collection...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::search_result(
                        source.source(),
                        source.score,
                        &source.text.chars().take(100).collect::<String>(),
                    );
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
