use extract::Extractor;
use graph::KnowledgeGraph;
use ingest::{ChunkerConfig, WordChunker};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::events::ProgressEvent;

/// Chunk -> extract -> accumulate, strictly in chunk order with one LLM call
/// in flight at a time, so progress events are deterministic and can be
/// streamed to a caller as they happen.
pub struct GraphPipeline {
    chunker: WordChunker,
    extractor: Extractor,
}

impl GraphPipeline {
    pub fn new(extractor: Extractor, chunker_config: ChunkerConfig) -> Self {
        Self {
            chunker: WordChunker::new(chunker_config),
            extractor,
        }
    }

    /// Build a fresh graph for one document.
    ///
    /// Every chunk produces exactly one event; a failed chunk contributes
    /// zero triples and the build continues. A closed receiver means the
    /// caller went away, so the build stops early and returns what it has.
    pub async fn build(
        &self,
        text: &str,
        events: &mpsc::Sender<ProgressEvent>,
    ) -> KnowledgeGraph {
        let chunks = self.chunker.chunk_text(text);
        let mut graph = KnowledgeGraph::new();
        let mut chunks_failed = 0;

        for chunk in &chunks {
            let event = match self.extractor.extract_from_text(&chunk.text).await {
                Ok(triples) => {
                    graph.add_triples(&triples);
                    ProgressEvent::ChunkExtracted {
                        chunk_index: chunk.index,
                        triples,
                        node_count: graph.node_count(),
                        edge_count: graph.edge_count(),
                    }
                }
                Err(e) => {
                    warn!(chunk_index = chunk.index, error = %e, "Chunk extraction failed");
                    chunks_failed += 1;
                    ProgressEvent::ChunkFailed {
                        chunk_index: chunk.index,
                        error: e.to_string(),
                    }
                }
            };

            if events.send(event).await.is_err() {
                info!("Progress receiver closed, stopping build early");
                return graph;
            }
        }

        info!(
            chunks = chunks.len(),
            failed = chunks_failed,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph build complete"
        );

        let _ = events
            .send(ProgressEvent::Done {
                chunks_processed: chunks.len(),
                chunks_failed,
                node_count: graph.node_count(),
                edge_count: graph.edge_count(),
            })
            .await;

        graph
    }
}
