//! Recursive character text splitting for knowledge base ingestion

use std::collections::VecDeque;

use crate::domain::errors::DomainError;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits documents into overlapping chunks.
///
/// Text is cut on the coarsest separator present, pieces are merged back
/// greedily up to `chunk_size` characters, and pieces that are still too
/// large are split again with the next separator.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, DomainError> {
        if chunk_size == 0 {
            return Err(DomainError::Validation(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap > chunk_size {
            return Err(DomainError::Validation(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into non-empty chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = "";
        let mut remaining: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep.as_str()) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|p| !p.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting, separator));
                fitting.clear();
            }
            if remaining.is_empty() {
                let piece = piece.trim();
                if !piece.is_empty() {
                    chunks.push(piece.to_string());
                }
            } else {
                chunks.extend(self.split_with(piece, remaining));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting, separator));
        }
        chunks
    }

    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let joined_len = if current.is_empty() { 0 } else { sep_len };
            if total + len + joined_len > self.chunk_size && !current.is_empty() {
                push_joined(&mut chunks, &current, separator);
                // Keep trailing pieces as overlap for the next chunk
                loop {
                    let pending_sep = if current.is_empty() { 0 } else { sep_len };
                    let over_budget = total > 0 && total + len + pending_sep > self.chunk_size;
                    if total <= self.chunk_overlap && !over_budget {
                        break;
                    }
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    let dropped_sep = if current.is_empty() { 0 } else { sep_len };
                    total = total.saturating_sub(char_len(front) + dropped_sep);
                }
            }
            current.push_back(piece);
            total += len;
            if current.len() > 1 {
                total += sep_len;
            }
        }
        push_joined(&mut chunks, &current, separator);
        chunks
    }
}

fn push_joined(chunks: &mut Vec<String>, pieces: &VecDeque<&str>, separator: &str) {
    let joined = pieces
        .iter()
        .copied()
        .collect::<Vec<_>>()
        .join(separator);
    let joined = joined.trim();
    if !joined.is_empty() {
        chunks.push(joined.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let splitter = TextSplitter::default();
        let chunks = splitter.split("Reset your password from the login page.");
        assert_eq!(chunks, vec!["Reset your password from the login page."]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let splitter = TextSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("\n\n  \n").is_empty());
    }

    #[test]
    fn test_overlap_between_chunks() {
        let splitter = TextSplitter::new(10, 4).unwrap();
        let chunks = splitter.split("aaa bbb ccc ddd eee");
        assert_eq!(chunks, vec!["aaa bbb", "bbb ccc", "ccc ddd", "ddd eee"]);
    }

    #[test]
    fn test_chunks_respect_size() {
        let splitter = TextSplitter::new(50, 10).unwrap();
        let paragraph = "Billing questions go to the finance team. ".repeat(5);
        let text = format!("{}\n\n{}\n\n{}", paragraph, paragraph, paragraph);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 3);
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(chunk.chars().count() <= 50, "chunk too long: {}", chunk);
        }
    }

    #[test]
    fn test_long_word_falls_back_to_characters() {
        let splitter = TextSplitter::new(4, 0).unwrap();
        let chunks = splitter.split("abcdefghij");
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let splitter = TextSplitter::new(3, 0).unwrap();
        let chunks = splitter.split("ééééé");
        assert_eq!(chunks, vec!["ééé", "éé"]);
    }

    #[test]
    fn test_rejects_overlap_larger_than_size() {
        assert!(TextSplitter::new(10, 20).is_err());
        assert!(TextSplitter::new(0, 0).is_err());
    }
}
