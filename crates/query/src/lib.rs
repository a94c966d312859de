pub mod engine;
pub mod llm;
pub mod selection;

pub use engine::{AnswerTrace, GraphAnswer, Retriever};
pub use llm::QueryLLM;
pub use selection::{RootSelection, parse_root_selection};
