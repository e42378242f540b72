//! CLI module for Minne.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Minne - Document RAG
///
/// A local-first CLI tool for building a searchable knowledge base from your
/// documents. The name "Minne" comes from the Norwegian word for "memory."
#[derive(Parser, Debug)]
#[command(name = "minne")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Collection to operate on (overrides the configured one)
    #[arg(long, global = true)]
    pub collection: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Minne and verify configuration
    Init,

    /// Add a piece of text (or the built-in samples) to the collection
    Add {
        /// Text to add
        text: Option<String>,

        /// Index the built-in sample corpus instead of a text argument
        #[arg(long)]
        sample: bool,

        /// Source label stored in the metadata
        #[arg(short, long, default_value = "user input")]
        source: String,
    },

    /// Load, chunk, and index documents from a file or directory
    Load {
        /// File or directory to load
        path: String,

        /// File extensions to include when loading a directory
        #[arg(long, default_value = "txt,md", value_delimiter = ',')]
        extensions: Vec<String>,

        /// Chunk size in characters (defaults to the configured value)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Chunk overlap in characters (defaults to the configured value)
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },

    /// Search the collection for similar chunks
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long, default_value = "3")]
        limit: usize,
    },

    /// Ask a question and get an answer grounded in the collection
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum number of context chunks to include
        #[arg(short = 'c', long)]
        max_chunks: Option<usize>,
    },

    /// Show collection statistics
    List,

    /// Delete the collection's snapshot and start empty
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Check connectivity to the chat model
    TestLlm,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "rag.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
