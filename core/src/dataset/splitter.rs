use crate::dataset::Document;
use anyhow::{Result, ensure};

/// Splits text into windows of `chunk_size` whitespace-separated words, each
/// sharing its first `chunk_overlap` words with the end of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TokenTextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 128,
        }
    }
}

impl TokenTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        ensure!(chunk_size > 0, "chunk_size must be positive");
        ensure!(
            chunk_overlap < chunk_size,
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        );
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return vec![];
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += step;
        }

        chunks
    }

    pub fn split_documents(&self, documents: &[Document]) -> Vec<String> {
        documents
            .iter()
            .flat_map(|doc| self.split_text(&doc.text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_text_is_one_chunk() {
        let splitter = TokenTextSplitter::default();
        assert_eq!(splitter.split_text("a  b\nc"), vec!["a b c"]);
    }

    #[test]
    fn windows_overlap() {
        let splitter = TokenTextSplitter::new(4, 2).unwrap();
        let chunks = splitter.split_text(&numbered(8));
        assert_eq!(
            chunks,
            vec!["w0 w1 w2 w3", "w2 w3 w4 w5", "w4 w5 w6 w7"]
        );
    }

    #[test]
    fn last_window_may_be_short() {
        let splitter = TokenTextSplitter::new(4, 1).unwrap();
        let chunks = splitter.split_text(&numbered(6));
        assert_eq!(chunks, vec!["w0 w1 w2 w3", "w3 w4 w5"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(TokenTextSplitter::default().split_text(" \n ").is_empty());
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        assert!(TokenTextSplitter::new(4, 4).is_err());
        assert!(TokenTextSplitter::new(0, 0).is_err());
    }
}
