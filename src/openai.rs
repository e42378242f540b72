//! OpenAI client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for API requests (30 seconds).
///
/// Provider calls fail fast on expiry; callers surface the error rather
/// than retrying.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create an OpenAI-compatible client with the default timeout.
///
/// API key and base URL come from the `OPENAI_API_KEY` and
/// `OPENAI_API_BASE` environment variables unless `api_base` overrides the
/// latter (for self-hosted OpenAI-compatible endpoints).
pub fn create_client(api_base: Option<&str>) -> Client<OpenAIConfig> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS), api_base)
}

/// Create an OpenAI-compatible client with a custom timeout.
pub fn create_client_with_timeout(
    timeout: Duration,
    api_base: Option<&str>,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Client::with_config(config).with_http_client(http_client)
}
