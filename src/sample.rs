//! Built-in sample corpus for trying the pipeline without any files.

use crate::documents::LoadedDocument;
use crate::store::Metadata;

/// A short demo corpus about retrieval-augmented generation.
///
/// Each entry carries `source` and `category` metadata, so the sample data
/// also exercises metadata round-trips through indexing and search.
pub fn sample_documents() -> Vec<LoadedDocument> {
    let entries = [
        (
            "Retrieval-augmented generation (RAG) answers a question by first retrieving \
             relevant text from a knowledge base and then conditioning a language model's \
             response on that text. It grounds answers in real documents instead of relying \
             on the model's parametric memory alone.",
            "RAG overview",
            "concepts",
        ),
        (
            "An embedding is a fixed-length numeric vector representing the semantic content \
             of a text. Texts with similar meaning map to nearby vectors, which makes \
             similarity comparable with simple geometric measures.",
            "Embeddings",
            "concepts",
        ),
        (
            "A vector store keeps embedding vectors alongside the text they came from and \
             answers nearest-neighbor queries. Small corpora are well served by an exact \
             scan; larger ones typically add an approximate index structure.",
            "Vector stores",
            "components",
        ),
        (
            "Cosine similarity ranks two vectors by the angle between them, ignoring their \
             magnitudes. It is the usual choice for comparing text embeddings because \
             embedding norms carry little semantic signal.",
            "Similarity metrics",
            "components",
        ),
        (
            "Document chunking splits long texts into smaller pieces before embedding. \
             Chunk size trades retrieval precision against context completeness, and a \
             small overlap between neighboring chunks avoids losing information at the \
             boundaries.",
            "Chunking strategies",
            "techniques",
        ),
        (
            "Write-through persistence saves every mutation to durable storage before the \
             operation is considered complete. A crash immediately after an acknowledged \
             write then never loses data, at the cost of a save per mutation.",
            "Persistence policies",
            "components",
        ),
        (
            "Prompt engineering shapes the instructions given to a language model. For RAG, \
             the prompt typically presents the retrieved excerpts as context and asks the \
             model to answer only from them, admitting ignorance otherwise.",
            "Prompt engineering",
            "techniques",
        ),
        (
            "Tombstone deletion marks a record as removed without shifting its neighbors, \
             keeping positions stable until a later compaction rewrites the data without \
             the dead entries.",
            "Deletion and compaction",
            "components",
        ),
    ];

    entries
        .into_iter()
        .map(|(text, source, category)| {
            let mut metadata = Metadata::new();
            metadata.insert("source".to_string(), source.into());
            metadata.insert("category".to_string(), category.into());
            LoadedDocument {
                text: text.to_string(),
                metadata,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_documents_have_metadata() {
        let docs = sample_documents();
        assert!(docs.len() >= 5);
        for doc in &docs {
            assert!(!doc.text.is_empty());
            assert!(doc.metadata.contains_key("source"));
            assert!(doc.metadata.contains_key("category"));
        }
    }
}
