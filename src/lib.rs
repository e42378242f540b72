//! Minne - Document RAG
//!
//! A local-first CLI tool for building a searchable knowledge base from your
//! documents and asking questions about it.
//!
//! The name "Minne" comes from the Norwegian word for "memory."
//!
//! # Overview
//!
//! Minne lets you:
//! - Index plain-text documents and ad-hoc snippets with embeddings
//! - Search your collection semantically
//! - Ask questions and get AI-generated answers grounded in your documents
//!
//! The vector store is implemented from scratch: an exact-search in-memory
//! store persisted to an atomic on-disk snapshot, with no external database.
//! Embeddings and answers come from an OpenAI-compatible API.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `documents` - Document loading from the filesystem
//! - `chunking` - Text splitting
//! - `embedding` - Embedding generation
//! - `store` - Vector record store and snapshot persistence
//! - `retrieval` - Retrieval service and RAG engine
//! - `llm` - Chat-completion client
//!
//! # Example
//!
//! ```rust,no_run
//! use minne::config::Settings;
//! use minne::embedding::OpenAIEmbedder;
//! use minne::retrieval::RetrievalService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let embedder = Arc::new(OpenAIEmbedder::with_config(
//!         &settings.embedding.model,
//!         settings.embedding.dimensions as usize,
//!         None,
//!     ));
//!     let service = RetrievalService::open(settings.collection_path(), embedder)?;
//!
//!     service
//!         .index(vec!["Rust is a systems language.".to_string()], Vec::new())
//!         .await?;
//!     let hits = service.retrieve("what is Rust?", 3).await?;
//!     println!("{} hits", hits.len());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod retrieval;
pub mod sample;
pub mod store;

pub use error::{MinneError, Result};
