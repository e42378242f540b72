//! Test-llm command implementation.

use super::build_chat;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::llm::ChatMessage;
use anyhow::Result;

/// Run the test-llm command: a one-shot connectivity check.
pub async fn run_test_llm(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check_credentials(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let chat = build_chat(&settings, None);

    Output::info(&format!(
        "Testing chat model '{}'...",
        settings.rag.model
    ));
    let spinner = Output::spinner("Waiting for response...");

    let result = chat
        .complete(
            &[ChatMessage::user(
                "Hello! Please introduce yourself in one sentence.",
            )],
            None,
        )
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => {
            Output::success("Model responded:");
            println!("\n{}\n", reply);
        }
        Err(e) => {
            Output::error(&format!("Connectivity check failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
