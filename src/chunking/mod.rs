//! Text chunking for breaking documents into indexable pieces.
//!
//! Splits on progressively finer separators (paragraph, line, word) and
//! merges the pieces back into chunks near the target size, carrying a
//! configurable overlap between consecutive chunks so retrieval does not
//! lose context at chunk boundaries.

/// Separators tried in order, coarsest first. The empty string means a hard
/// cut at character boundaries.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character text splitter.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter targeting `chunk_size` characters per chunk with
    /// `chunk_overlap` characters shared between neighbors.
    ///
    /// The overlap is clamped below the chunk size so splitting always
    /// makes progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split `text` into chunks. Whitespace-only chunks are dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((separator, rest)) = separators.split_first() else {
            return self.split_by_size(text);
        };

        if separator.is_empty() {
            return self.split_by_size(text);
        }

        if !text.contains(separator) {
            return self.split_recursive(text, rest);
        }

        let parts: Vec<&str> = text.split(separator).collect();
        self.merge_parts(&parts, separator, rest)
    }

    /// Merge split parts back into chunks no longer than `chunk_size`,
    /// keeping a tail of previous parts as overlap. Parts that are
    /// themselves oversized recurse with the finer separators.
    fn merge_parts(&self, parts: &[&str], separator: &str, rest: &[&str]) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;

        for part in parts {
            let part_len = char_len(part);

            if part_len > self.chunk_size {
                if !current.is_empty() {
                    chunks.push(current.join(separator));
                    current.clear();
                    current_len = 0;
                }
                chunks.extend(self.split_recursive(part, rest));
                continue;
            }

            let joined_len = if current.is_empty() { 0 } else { sep_len };
            if !current.is_empty() && current_len + joined_len + part_len > self.chunk_size {
                chunks.push(current.join(separator));

                let mut kept: Vec<&str> = Vec::new();
                let mut kept_len = 0;
                for prev in current.iter().rev() {
                    let extra = char_len(prev) + if kept.is_empty() { 0 } else { sep_len };
                    if kept_len + extra > self.chunk_overlap {
                        break;
                    }
                    kept_len += extra;
                    kept.push(prev);
                }
                kept.reverse();
                current = kept;
                current_len = kept_len;
            }

            if !current.is_empty() {
                current_len += sep_len;
            }
            current.push(part);
            current_len += part_len;
        }

        if !current.is_empty() {
            chunks.push(current.join(separator));
        }

        chunks
    }

    /// Hard cut at character boundaries, advancing by size minus overlap.
    fn split_by_size(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = (self.chunk_size - self.chunk_overlap).max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
