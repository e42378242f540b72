//! Pre-flight checks before operations that call a provider.
//!
//! Validates that API credentials are available before starting operations
//! that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{MinneError, Result};

/// Check that provider credentials are configured.
///
/// A configured base URL override (config or `OPENAI_API_BASE`) counts as
/// sufficient, since self-hosted OpenAI-compatible endpoints commonly run
/// without keys.
pub fn check_credentials(settings: &Settings) -> Result<()> {
    let has_base_override = settings.embedding.api_base.is_some()
        || settings.rag.api_base.is_some()
        || std::env::var("OPENAI_API_BASE").map(|v| !v.is_empty()).unwrap_or(false);
    if has_base_override {
        return Ok(());
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        _ => Err(MinneError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...' \
             or configure an api_base for a keyless endpoint."
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_override_satisfies_check() {
        let mut settings = Settings::default();
        settings.rag.api_base = Some("http://localhost:8080/v1".to_string());
        assert!(check_credentials(&settings).is_ok());
    }
}
