//! Text-level retrieval service with write-through persistence.

use super::RetrievedChunk;
use crate::embedding::Embedder;
use crate::error::{MinneError, Result};
use crate::store::{snapshot, Metadata, VectorRecordStore};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Summary of the store behind a service.
#[derive(Debug, Clone, Copy)]
pub struct StoreStats {
    /// Number of live records.
    pub live_records: usize,
    /// Established embedding dimension, if any record was ever added.
    pub dimension: Option<usize>,
}

/// Combines an embedding provider with a persisted vector record store.
///
/// Every mutation is written through to the snapshot directory before the
/// call returns. Searches take a read lock against the last committed
/// in-memory state; mutations and their saves are serialized by a single
/// write gate, and saves work on a clone of the store so readers never see
/// a half-written one. Locks are never held across an await point.
pub struct RetrievalService {
    embedder: Arc<dyn Embedder>,
    store: RwLock<VectorRecordStore>,
    write_gate: Mutex<()>,
    path: PathBuf,
}

impl RetrievalService {
    /// Open the collection at `path`, loading its snapshot if one exists.
    ///
    /// A missing snapshot starts an empty collection. A corrupt snapshot
    /// also starts empty, but is logged loudly because it means previously
    /// indexed records are gone. Other persistence failures propagate.
    pub fn open(path: PathBuf, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let store = match snapshot::load(&path) {
            Ok(store) => {
                debug!(
                    "Loaded {} records from snapshot at {}",
                    store.len(),
                    path.display()
                );
                store
            }
            Err(MinneError::SnapshotNotFound(_)) => {
                info!(
                    "No snapshot at {}, starting with an empty collection",
                    path.display()
                );
                VectorRecordStore::new()
            }
            Err(MinneError::CorruptSnapshot(reason)) => {
                warn!(
                    "Discarding corrupt snapshot at {}: {}. Previously indexed records are lost.",
                    path.display(),
                    reason
                );
                VectorRecordStore::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            embedder,
            store: RwLock::new(store),
            write_gate: Mutex::new(()),
            path,
        })
    }

    /// Snapshot directory this service persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current live record count and dimension.
    pub fn stats(&self) -> StoreStats {
        let store = self.store.read().unwrap();
        StoreStats {
            live_records: store.len(),
            dimension: store.dimension(),
        }
    }

    /// Embed and store the given texts, returning the assigned record ids.
    ///
    /// `metadatas` must be empty (no metadata) or match `texts` in length.
    /// The mutation is written through: a failed save surfaces as a
    /// [`MinneError::Persistence`] while the in-memory store stays mutated,
    /// so the caller can retry with [`RetrievalService::save`].
    #[instrument(skip(self, texts, metadatas), fields(count = texts.len()))]
    pub async fn index(&self, texts: Vec<String>, metadatas: Vec<Metadata>) -> Result<Vec<Uuid>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let metadatas = if metadatas.is_empty() {
            vec![Metadata::new(); texts.len()]
        } else if metadatas.len() == texts.len() {
            metadatas
        } else {
            return Err(MinneError::InvalidInput(format!(
                "got {} texts but {} metadata entries",
                texts.len(),
                metadatas.len()
            )));
        };

        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(MinneError::Embedding(format!(
                "provider returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        let entries: Vec<(Vec<f32>, String, Metadata)> = embeddings
            .into_iter()
            .zip(texts)
            .zip(metadatas)
            .map(|((vector, text), metadata)| (vector, text, metadata))
            .collect();

        let _gate = self.write_gate.lock().unwrap();
        let ids = self.store.write().unwrap().add(entries)?;

        let committed = self.store.read().unwrap().clone();
        snapshot::save(&committed, &self.path)?;

        info!("Indexed {} documents", ids.len());
        Ok(ids)
    }

    /// Embed `query` and return the `k` most similar chunks, best first.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.store.read().unwrap().search(&query_embedding, k)?;
        Ok(hits.into_iter().map(RetrievedChunk::from).collect())
    }

    /// Persist the current in-memory state on demand.
    ///
    /// Useful to retry after a write-through save failed.
    pub fn save(&self) -> Result<()> {
        let _gate = self.write_gate.lock().unwrap();
        let committed = self.store.read().unwrap().clone();
        snapshot::save(&committed, &self.path)
    }

    /// Delete the on-disk snapshot and reset to an empty store.
    ///
    /// The established embedding dimension is kept if known; otherwise the
    /// next index call re-establishes it.
    pub fn clear(&self) -> Result<()> {
        let _gate = self.write_gate.lock().unwrap();
        snapshot::remove(&self.path)?;

        let mut store = self.store.write().unwrap();
        *store = match store.dimension() {
            Some(dimension) => VectorRecordStore::with_dimension(dimension),
            None => VectorRecordStore::new(),
        };
        Ok(())
    }
}
