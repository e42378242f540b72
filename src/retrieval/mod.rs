//! Retrieval and answer generation over the vector store.
//!
//! [`RetrievalService`] is the text-level facade: it embeds queries and
//! documents, keeps the store persisted write-through, and hands out
//! retrieved chunks. [`RagEngine`] layers answer generation on top.

pub mod engine;
pub mod service;

pub use engine::{RagEngine, RagResponse};
pub use service::{RetrievalService, StoreStats};

use crate::store::{Metadata, SearchHit};
use uuid::Uuid;

/// A retrieved document chunk with its similarity score.
///
/// Embedding vectors never cross this boundary; callers see text and
/// metadata only.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Record ID in the store.
    pub id: Uuid,
    /// Text content.
    pub text: String,
    /// Metadata the chunk was indexed with.
    pub metadata: Metadata,
    /// Similarity score (higher is better).
    pub score: f32,
}

impl RetrievedChunk {
    /// Human-readable source label from the metadata, if any.
    pub fn source(&self) -> &str {
        self.metadata
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown source")
    }
}

impl From<SearchHit> for RetrievedChunk {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.record.id,
            text: hit.record.text,
            metadata: hit.record.metadata,
            score: hit.score,
        }
    }
}

/// Format retrieved chunks for inclusion in a prompt.
pub fn format_context_for_prompt(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "---\n[{}] {}\n{}\n---",
                i + 1,
                chunk.source(),
                chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, source: Option<&str>) -> RetrievedChunk {
        let mut metadata = Metadata::new();
        if let Some(source) = source {
            metadata.insert("source".to_string(), source.into());
        }
        RetrievedChunk {
            id: Uuid::new_v4(),
            text: text.to_string(),
            metadata,
            score: 0.9,
        }
    }

    #[test]
    fn test_source_label() {
        assert_eq!(chunk("t", Some("notes.md")).source(), "notes.md");
        assert_eq!(chunk("t", None).source(), "unknown source");
    }

    #[test]
    fn test_format_context_numbers_chunks() {
        let chunks = vec![chunk("first text", Some("a.txt")), chunk("second text", None)];
        let formatted = format_context_for_prompt(&chunks);
        assert!(formatted.contains("[1] a.txt"));
        assert!(formatted.contains("first text"));
        assert!(formatted.contains("[2] unknown source"));
        assert!(formatted.contains("second text"));
    }
}
