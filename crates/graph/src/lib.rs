pub mod store;
pub mod traverse;

pub use store::{Edge, EdgeSnapshot, GraphSnapshot, KnowledgeGraph};
pub use traverse::{DEFAULT_MAX_DEPTH, Subgraph, traverse};
