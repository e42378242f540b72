//! Document loading from the filesystem.
//!
//! Loads plain-text documents from a single file or a directory tree,
//! attaching the origin path as `source` metadata. Chunking is a separate
//! concern; see [`crate::chunking`].

use crate::error::{MinneError, Result};
use crate::store::Metadata;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// A document read from disk, ready for chunking and indexing.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Full text content.
    pub text: String,
    /// Metadata carrying at least a `source` entry.
    pub metadata: Metadata,
}

impl LoadedDocument {
    /// Create a document with a `source` metadata entry.
    pub fn new(text: String, source: &str) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), source.into());
        Self { text, metadata }
    }
}

/// Load documents from `path`.
///
/// A file is loaded directly; a directory is walked recursively and every
/// file whose extension matches one of `extensions` (case-insensitive,
/// without the dot) is loaded. Files are visited in name order so repeated
/// runs index identically.
pub fn load_path(path: &Path, extensions: &[String]) -> Result<Vec<LoadedDocument>> {
    if path.is_dir() {
        load_directory(path, extensions)
    } else {
        Ok(vec![load_file(path)?])
    }
}

fn load_file(path: &Path) -> Result<LoadedDocument> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| MinneError::Document(format!("read {}: {}", path.display(), e)))?;
    debug!("Loaded {} ({} characters)", path.display(), text.len());
    Ok(LoadedDocument::new(text, &path.display().to_string()))
}

fn load_directory(path: &Path, extensions: &[String]) -> Result<Vec<LoadedDocument>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry =
            entry.map_err(|e| MinneError::Document(format!("walk {}: {}", path.display(), e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !matches_extension(entry.path(), extensions) {
            continue;
        }
        documents.push(load_file(entry.path())?);
    }

    Ok(documents)
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.txt");
        fs::write(&file, "hello world").unwrap();

        let docs = load_path(&file, &exts(&["txt"])).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "hello world");
        assert_eq!(
            docs[0].metadata.get("source").and_then(|v| v.as_str()),
            Some(file.display().to_string().as_str())
        );
    }

    #[test]
    fn test_load_directory_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("c.rs"), "c").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.TXT"), "d").unwrap();

        let docs = load_path(dir.path(), &exts(&["txt", "md"])).unwrap();
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let docs = load_path(dir.path(), &exts(&["txt"])).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("absent.txt"), &exts(&["txt"])).unwrap_err();
        assert!(matches!(err, MinneError::Document(_)));
    }
}
