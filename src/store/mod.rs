//! Vector record store with exact similarity search.
//!
//! Owns the mapping from record id to (embedding, text, metadata) and answers
//! nearest-neighbor queries by scoring every live record. Search is O(n * D)
//! per query, which is fine at the corpus sizes this tool targets; the scan
//! is an implementation detail behind [`VectorRecordStore::search`], so an
//! ANN index could replace it without touching callers.

pub mod snapshot;

use crate::error::{MinneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Scalar metadata attached to a record (string, number, or bool values).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A single stored document chunk with its embedding.
///
/// Records are immutable once created; the only way to change one is to
/// delete it and add a replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Unique record ID, stable across process restarts.
    pub id: Uuid,
    /// Embedding vector. All vectors in a store share one dimension.
    pub vector: Vec<f32>,
    /// Text content of this chunk.
    pub text: String,
    /// Caller-supplied metadata (source, category, ...).
    #[serde(default)]
    pub metadata: Metadata,
}

/// A search result with its similarity score.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched record.
    pub record: Record,
    /// Cosine similarity to the query (higher is better).
    pub score: f32,
}

/// In-memory store of embedded records.
///
/// Records live in insertion order; deletion tombstones an id instead of
/// shifting the sequence, so slots stay stable until the next save compacts
/// them away. The vector dimension is fixed by the first insert and every
/// later insert must match it.
#[derive(Debug, Clone, Default)]
pub struct VectorRecordStore {
    records: Vec<Record>,
    tombstones: HashSet<Uuid>,
    dimension: Option<usize>,
}

impl VectorRecordStore {
    /// Create an empty store. The dimension is fixed by the first add.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a pre-established dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            records: Vec::new(),
            tombstones: HashSet::new(),
            dimension: Some(dimension),
        }
    }

    /// Rebuild a store from previously persisted records.
    ///
    /// Used by the snapshot loader; the records are assumed to be live
    /// (tombstoned records are dropped at save time).
    pub fn from_records(dimension: Option<usize>, records: Vec<Record>) -> Self {
        Self {
            records,
            tombstones: HashSet::new(),
            dimension,
        }
    }

    /// The established vector dimension, if any record was ever added.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of live (non-tombstoned) records.
    pub fn len(&self) -> usize {
        self.records.len() - self.tombstones.len()
    }

    /// Whether the store has no live records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live records in insertion order.
    pub fn iter_live(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|r| !self.tombstones.contains(&r.id))
    }

    /// Add a batch of (vector, text, metadata) entries, returning the
    /// assigned ids in order.
    ///
    /// The first ever entry fixes the store dimension; every entry in this
    /// and later batches must match it. Validation happens before any
    /// mutation, so a failed add leaves the store exactly as it was.
    pub fn add(&mut self, entries: Vec<(Vec<f32>, String, Metadata)>) -> Result<Vec<Uuid>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let expected = self
            .dimension
            .unwrap_or_else(|| entries[0].0.len());
        for (vector, _, _) in &entries {
            if vector.len() != expected {
                return Err(MinneError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        self.dimension = Some(expected);

        let mut ids = Vec::with_capacity(entries.len());
        for (vector, text, metadata) in entries {
            let id = Uuid::new_v4();
            self.records.push(Record {
                id,
                vector,
                text,
                metadata,
            });
            ids.push(id);
        }

        Ok(ids)
    }

    /// Find the `k` records most similar to `query` by cosine similarity,
    /// best first. Ties keep insertion order (the earlier record wins).
    ///
    /// A store with no live records matches nothing and returns an empty
    /// vec, never an error, even before the query dimension is checked.
    /// `k` larger than the live record count returns every live record.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let Some(expected) = self.dimension else {
            // Nothing was ever added, so there is nothing to match.
            return Ok(Vec::new());
        };

        if self.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != expected {
            return Err(MinneError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .iter_live()
            .map(|record| SearchHit {
                record: record.clone(),
                score: cosine_similarity(query, &record.vector),
            })
            .collect();

        // Stable sort: equal scores preserve insertion order.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        Ok(hits)
    }

    /// Tombstone the given ids, returning how many records were newly
    /// removed. Unknown or already-deleted ids are ignored, so deleting
    /// twice is harmless.
    pub fn delete(&mut self, ids: &[Uuid]) -> usize {
        let mut removed = 0;
        for id in ids {
            let exists = self.records.iter().any(|r| r.id == *id);
            if exists && self.tombstones.insert(*id) {
                removed += 1;
            }
        }
        removed
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(source: &str) -> Metadata {
        let mut m = Metadata::new();
        m.insert("source".to_string(), source.into());
        m
    }

    fn entry(vector: Vec<f32>, text: &str) -> (Vec<f32>, String, Metadata) {
        (vector, text.to_string(), meta("test"))
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_exact_vector_is_top_hit() {
        let mut store = VectorRecordStore::new();
        store
            .add(vec![
                entry(vec![0.2, 0.9], "other"),
                entry(vec![0.7, 0.3], "target"),
            ])
            .unwrap();

        let hits = store.search(&[0.7, 0.3], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.text, "target");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_ordering_and_metric() {
        // Cosine ordering: query [1, 0.1] is closest to [1,0], then [1,1].
        let mut store = VectorRecordStore::new();
        store
            .add(vec![
                entry(vec![1.0, 0.0], "a"),
                entry(vec![0.0, 1.0], "b"),
                entry(vec![1.0, 1.0], "c"),
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.1], 2).unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.record.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_tie_break_keeps_insertion_order() {
        let mut store = VectorRecordStore::new();
        store
            .add(vec![
                entry(vec![1.0, 0.0], "first"),
                entry(vec![2.0, 0.0], "second"), // same direction, same cosine
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].record.text, "first");
        assert_eq!(hits[1].record.text, "second");
    }

    #[test]
    fn test_empty_store_search_is_empty_not_error() {
        let store = VectorRecordStore::new();
        let hits = store.search(&[1.0, 2.0, 3.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_k_larger_than_live_count() {
        let mut store = VectorRecordStore::new();
        store
            .add(vec![
                entry(vec![1.0, 0.0], "a"),
                entry(vec![0.0, 1.0], "b"),
                entry(vec![1.0, 1.0], "c"),
            ])
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 100).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_dimension_fixed_by_first_add() {
        let mut store = VectorRecordStore::new();
        store.add(vec![entry(vec![1.0, 0.0], "a")]).unwrap();
        assert_eq!(store.dimension(), Some(2));

        let err = store
            .add(vec![entry(vec![1.0, 2.0, 3.0], "bad")])
            .unwrap_err();
        assert!(matches!(
            err,
            MinneError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        // The failed add left the store untouched.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mixed_dimension_batch_rejected_atomically() {
        let mut store = VectorRecordStore::new();
        let err = store
            .add(vec![
                entry(vec![1.0, 0.0], "ok"),
                entry(vec![1.0, 0.0, 0.0], "bad"),
            ])
            .unwrap_err();
        assert!(matches!(err, MinneError::DimensionMismatch { .. }));
        assert_eq!(store.len(), 0);
        assert_eq!(store.dimension(), None);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let mut store = VectorRecordStore::new();
        store.add(vec![entry(vec![1.0, 0.0], "a")]).unwrap();

        let err = store.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, MinneError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = VectorRecordStore::new();
        let ids = store
            .add(vec![
                entry(vec![1.0, 0.0], "keep"),
                entry(vec![0.0, 1.0], "drop"),
            ])
            .unwrap();

        assert_eq!(store.delete(&[ids[1]]), 1);
        assert_eq!(store.delete(&[ids[1]]), 0);
        assert_eq!(store.len(), 1);

        // Unknown ids are silently ignored.
        assert_eq!(store.delete(&[Uuid::new_v4()]), 0);

        // The tombstoned record never reappears in searches.
        let hits = store.search(&[0.0, 1.0], 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.text, "keep");
    }

    #[test]
    fn test_search_after_deleting_everything_is_empty_not_error() {
        let mut store = VectorRecordStore::new();
        let ids = store.add(vec![entry(vec![1.0, 0.0], "a")]).unwrap();
        store.delete(&ids);

        // No live records: nothing matches, whatever the query looks like.
        assert!(store.search(&[1.0, 0.0], 3).unwrap().is_empty());
        assert!(store.search(&[1.0, 0.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_survives_deleting_everything() {
        let mut store = VectorRecordStore::new();
        let ids = store.add(vec![entry(vec![1.0, 0.0], "a")]).unwrap();
        store.delete(&ids);

        assert!(store.is_empty());
        assert_eq!(store.dimension(), Some(2));
        let err = store.add(vec![entry(vec![1.0], "short")]).unwrap_err();
        assert!(matches!(err, MinneError::DimensionMismatch { .. }));
    }
}
