pub mod chunk;
pub mod chunker;
pub mod reader;

pub use chunk::Chunk;
pub use chunker::{ChunkerConfig, WordChunker};
pub use reader::FileReader;
