use dashmap::DashMap;
use query::GraphAnswer;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::CacheConfig;

/// Answer cache keyed by (graph session, question). Graphs never change once
/// built, so a cached answer stays valid for the life of its session.
pub struct AnswerCache {
    entries: DashMap<String, GraphAnswer>,
    enabled: bool,
    max_entries: usize,
}

impl AnswerCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            enabled: config.enabled,
            max_entries: config.max_entries.max(1),
        }
    }

    pub fn get(&self, graph_id: &Uuid, question: &str) -> Option<GraphAnswer> {
        if !self.enabled {
            return None;
        }
        let key = Self::key(graph_id, question);
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    pub fn set(&self, graph_id: &Uuid, question: &str, answer: GraphAnswer) {
        if !self.enabled {
            return;
        }

        if self.entries.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .entries
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|entry| entry.key().clone())
                .collect();
            for key in to_remove {
                self.entries.remove(&key);
            }
        }

        self.entries.insert(Self::key(graph_id, question), answer);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn key(graph_id: &Uuid, question: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(graph_id.as_bytes());
        hasher.update(question.as_bytes());
        hex::encode(hasher.finalize())
    }
}
