use dashmap::DashMap;
use graph::KnowledgeGraph;
use std::sync::Arc;
use uuid::Uuid;

/// One graph per document session, keyed by a fresh UUID. Graphs are
/// immutable once built, so readers share them through an `Arc` without
/// locking. Nothing is persisted; a restart drops every session.
pub struct SessionStore {
    graphs: DashMap<Uuid, Arc<KnowledgeGraph>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            graphs: DashMap::new(),
        }
    }

    pub fn insert(&self, graph: KnowledgeGraph) -> Uuid {
        let id = Uuid::new_v4();
        self.graphs.insert(id, Arc::new(graph));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<KnowledgeGraph>> {
        self.graphs.get(id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.graphs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_get_and_remove() {
        let store = SessionStore::new();
        let id = store.insert(KnowledgeGraph::new());

        assert!(store.get(&id).is_some());
        assert_eq!(store.len(), 1);
        assert!(store.remove(&id));
        assert!(store.get(&id).is_none());
        assert!(!store.remove(&id));
    }

    #[test]
    fn test_unknown_id_misses() {
        let store = SessionStore::new();
        assert!(store.get(&Uuid::new_v4()).is_none());
    }
}
