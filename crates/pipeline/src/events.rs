use extract::Triple;
use serde::Serialize;

/// In-order progress events emitted while a graph is built. One event per
/// chunk, then a final `done`. Per-chunk failures are events, not errors:
/// the pipeline keeps going.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    ChunkExtracted {
        chunk_index: usize,
        triples: Vec<Triple>,
        node_count: usize,
        edge_count: usize,
    },
    ChunkFailed {
        chunk_index: usize,
        error: String,
    },
    Done {
        chunks_processed: usize,
        chunks_failed: usize,
        node_count: usize,
        edge_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_tagged() {
        let event = ProgressEvent::ChunkFailed {
            chunk_index: 2,
            error: "timeout".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "chunk_failed");
        assert_eq!(json["chunk_index"], 2);
        assert_eq!(json["error"], "timeout");
    }

    #[test]
    fn test_extracted_event_carries_triples() {
        let event = ProgressEvent::ChunkExtracted {
            chunk_index: 0,
            triples: vec![Triple {
                subject: "a".to_string(),
                predicate: "p".to_string(),
                object: "b".to_string(),
            }],
            node_count: 2,
            edge_count: 1,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "chunk_extracted");
        assert_eq!(json["triples"][0]["subject"], "a");
    }
}
