//! RAG answer generation.

use super::{format_context_for_prompt, RetrievalService, RetrievedChunk};
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::{ChatClient, ChatMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering.
pub struct RagEngine {
    service: Arc<RetrievalService>,
    chat: ChatClient,
    prompts: Prompts,
    max_context_chunks: usize,
}

impl RagEngine {
    /// Create a new RAG engine over an already-open retrieval service.
    pub fn new(
        service: Arc<RetrievalService>,
        chat: ChatClient,
        max_context_chunks: usize,
    ) -> Self {
        Self {
            service,
            chat,
            prompts: Prompts::default(),
            max_context_chunks,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Ask a single question and get an answer grounded in the collection.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        let sources = self
            .service
            .retrieve(question, self.max_context_chunks)
            .await?;

        if sources.is_empty() {
            return Ok(RagResponse {
                answer: "I couldn't find any relevant information in your collection for this question.".to_string(),
                sources: Vec::new(),
            });
        }

        let context = format_context_for_prompt(&sources);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context);

        let user_prompt = self.prompts.render_with_custom(&self.prompts.rag.user, &vars);
        let messages = vec![
            ChatMessage::system(self.prompts.rag.system.clone()),
            ChatMessage::user(user_prompt),
        ];

        let answer = self.chat.complete(&messages, None).await?;

        debug!("Generated response with {} sources", sources.len());

        Ok(RagResponse { answer, sources })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Source chunks used for the answer.
    pub sources: Vec<RetrievedChunk>,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\n{} (score: {:.2})",
                    source.source(),
                    source.score
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::store::Metadata;
    use async_trait::async_trait;
    use std::time::Duration;
    use uuid::Uuid;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn test_ask_on_empty_collection_skips_the_model() {
        // With no retrievable context the engine answers directly and the
        // chat client is never called, so no network access happens here.
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(
            RetrievalService::open(dir.path().join("c"), Arc::new(StubEmbedder)).unwrap(),
        );
        let chat = ChatClient::new("gpt-4o-mini", None, Duration::from_secs(1));
        let engine = RagEngine::new(service, chat, 4);

        let response = engine.ask("anything at all?").await.unwrap();
        assert!(response.answer.contains("couldn't find"));
        assert!(response.sources.is_empty());
    }

    #[test]
    fn test_format_for_display_lists_sources() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), "guide.md".into());

        let response = RagResponse {
            answer: "The answer.".to_string(),
            sources: vec![RetrievedChunk {
                id: Uuid::new_v4(),
                text: "chunk".to_string(),
                metadata,
                score: 0.87,
            }],
        };

        let display = response.format_for_display();
        assert!(display.starts_with("The answer."));
        assert!(display.contains("--- Sources ---"));
        assert!(display.contains("guide.md (score: 0.87)"));
    }

    #[test]
    fn test_format_for_display_without_sources() {
        let response = RagResponse {
            answer: "No idea.".to_string(),
            sources: Vec::new(),
        };
        assert_eq!(response.format_for_display(), "No idea.");
    }
}
