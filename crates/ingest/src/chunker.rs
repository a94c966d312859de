use crate::chunk::Chunk;

/// Overlap is capped below 0.5 so the stride stays positive and chunking
/// always terminates.
const MAX_OVERLAP_FRACTION: f64 = 0.45;

pub struct ChunkerConfig {
    /// Chunk size in words.
    pub chunk_size: usize,
    /// Fraction of `chunk_size` shared between consecutive chunks.
    pub overlap_fraction: f64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            overlap_fraction: 0.10,
        }
    }
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap_fraction: f64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap_fraction: overlap_fraction.clamp(0.0, MAX_OVERLAP_FRACTION),
        }
    }
}

pub struct WordChunker {
    config: ChunkerConfig,
}

impl WordChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Split `text` on whitespace and emit overlapping word-windows covering
    /// every word exactly once per position. The final window always ends at
    /// the last word, even when the stride would overshoot it.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let total = words.len();

        if total == 0 {
            return Vec::new();
        }

        let size = self.config.chunk_size;
        let stride = ((size as f64 * (1.0 - self.config.overlap_fraction)).floor() as usize).max(1);

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + size).min(total);
            chunks.push(Chunk {
                index: chunks.len(),
                start_word: start,
                end_word: end,
                text: words[start..end].join(" "),
            });

            if end == total {
                break;
            }
            start += stride;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = WordChunker::new(ChunkerConfig::default());
        assert!(chunker.chunk_text("").is_empty());
        assert!(chunker.chunk_text("   \n\t ").is_empty());
    }

    #[test]
    fn test_short_input_yields_single_chunk() {
        let chunker = WordChunker::new(ChunkerConfig::new(10, 0.10));
        let chunks = chunker.chunk_text(&words(7));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_word, 0);
        assert_eq!(chunks[0].end_word, 7);
        assert_eq!(chunks[0].word_count(), 7);
    }

    #[test]
    fn test_chunks_cover_all_words() {
        let chunker = WordChunker::new(ChunkerConfig::new(10, 0.10));
        let chunks = chunker.chunk_text(&words(37));

        assert_eq!(chunks[0].start_word, 0);
        assert_eq!(chunks.last().unwrap().end_word, 37);
        for pair in chunks.windows(2) {
            // No gap between consecutive windows.
            assert!(pair[1].start_word <= pair[0].end_word);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        // size 10, overlap 0.10 -> stride 9, so each window shares one word.
        let chunker = WordChunker::new(ChunkerConfig::new(10, 0.10));
        let chunks = chunker.chunk_text(&words(30));

        assert!(chunks.len() > 1);
        assert_eq!(chunks[1].start_word, 9);
        assert_eq!(chunks[0].end_word, 10);
    }

    #[test]
    fn test_indices_are_ordinal() {
        let chunker = WordChunker::new(ChunkerConfig::new(5, 0.0));
        let chunks = chunker.chunk_text(&words(23));

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_extreme_overlap_is_clamped_and_terminates() {
        // An overlap >= 1.0 would make the stride zero; the config clamps it.
        let config = ChunkerConfig::new(4, 1.5);
        assert!(config.overlap_fraction < 0.5);

        let chunker = WordChunker::new(config);
        let chunks = chunker.chunk_text(&words(20));
        assert_eq!(chunks.last().unwrap().end_word, 20);
    }

    #[test]
    fn test_stride_floors_at_one_word() {
        // chunk_size 1 with any overlap must still advance.
        let chunker = WordChunker::new(ChunkerConfig::new(1, 0.45));
        let chunks = chunker.chunk_text(&words(5));

        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks.last().unwrap().end_word, 5);
    }
}
