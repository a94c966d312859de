use serde::{Deserialize, Serialize};

/// A contiguous word-window of the source text. Read-only once produced;
/// consecutive chunks overlap intentionally so relations are not severed at
/// a boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Ordinal position in the document, starting at 0.
    pub index: usize,
    /// First word index covered by this chunk (inclusive).
    pub start_word: usize,
    /// One past the last word index covered by this chunk.
    pub end_word: usize,
    pub text: String,
}

impl Chunk {
    pub fn word_count(&self) -> usize {
        self.end_word - self.start_word
    }
}
