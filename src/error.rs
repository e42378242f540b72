//! Error types for Minne.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for Minne operations.
#[derive(Error, Debug)]
pub enum MinneError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No snapshot found at {0}")]
    SnapshotNotFound(PathBuf),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Document loading failed: {0}")]
    Document(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Minne operations.
pub type Result<T> = std::result::Result<T, MinneError>;
