pub mod builder;
pub mod events;

pub use builder::GraphPipeline;
pub use events::ProgressEvent;
