//! Prompt templates for Minne.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for RAG response generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful AI assistant. Answer the user's question using the provided context excerpts.

Guidelines:
- Use only the information in the context to answer
- If the context does not contain the answer, say that you don't know instead of inventing one
- Cite the source of the excerpts you rely on when it is available
- Be thorough but avoid padding"#
                .to_string(),

            user: r#"Context:
{{context}}

Question: {{question}}

Provide a detailed and helpful answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from `custom_dir` if present.
    ///
    /// A `rag.toml` file in the custom directory replaces the matching
    /// template fields; anything missing keeps its default.
    pub fn load(
        custom_dir: Option<&str>,
        variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let rag_path = PathBuf::from(shellexpand::tilde(dir).to_string()).join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        if let Some(vars) = variables {
            prompts.variables = vars.clone();
        }

        Ok(prompts)
    }

    /// Render a template, substituting `{{name}}` placeholders from `vars`
    /// first and the configured custom variables second.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut rendered = template.to_string();
        for (key, value) in vars {
            rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
        }
        for (key, value) in &self.variables {
            rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let prompts = Prompts::default();
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "what is RAG?".to_string());
        vars.insert("context".to_string(), "RAG is retrieval.".to_string());

        let rendered = prompts.render_with_custom(&prompts.rag.user, &vars);
        assert!(rendered.contains("what is RAG?"));
        assert!(rendered.contains("RAG is retrieval."));
        assert!(!rendered.contains("{{question}}"));
    }

    #[test]
    fn test_custom_variables_apply() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("tone".to_string(), "formal".to_string());

        let rendered = prompts.render_with_custom("Answer in a {{tone}} tone.", &HashMap::new());
        assert_eq!(rendered, "Answer in a formal tone.");
    }

    #[test]
    fn test_load_defaults_without_custom_dir() {
        let prompts = Prompts::load(None, None).unwrap();
        assert!(prompts.rag.system.contains("context"));
    }
}
