use extract::Triple;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A directed relation between two nodes. Node identity is the normalized
/// label itself, so an edge stores two labels rather than references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub predicate: String,
    pub target: String,
}

impl Edge {
    /// Stable identifier used by callers to highlight traversal results.
    pub fn id(&self) -> String {
        format!("{}|{}|{}", self.source, self.predicate, self.target)
    }
}

/// Append-only graph for one document session. Nodes are deduplicated by
/// exact label equality, edges by the full (source, predicate, target) key.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    nodes: BTreeSet<String>,
    edges: Vec<Edge>,
    edge_keys: HashSet<(String, String, String)>,
    in_degree: HashMap<String, usize>,
    /// Undirected adjacency: node label -> indices into `edges`.
    adjacency: HashMap<String, Vec<usize>>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of triples into the graph. Idempotent: re-adding a
    /// triple that is already present changes nothing.
    pub fn add_triples(&mut self, batch: &[Triple]) {
        for triple in batch {
            self.add_triple(triple);
        }
    }

    fn add_triple(&mut self, triple: &Triple) {
        let key = (
            triple.subject.clone(),
            triple.predicate.clone(),
            triple.object.clone(),
        );
        if !self.edge_keys.insert(key) {
            return;
        }

        self.nodes.insert(triple.subject.clone());
        self.nodes.insert(triple.object.clone());

        let index = self.edges.len();
        self.edges.push(Edge {
            source: triple.subject.clone(),
            predicate: triple.predicate.clone(),
            target: triple.object.clone(),
        });

        self.adjacency
            .entry(triple.subject.clone())
            .or_default()
            .push(index);
        if triple.object != triple.subject {
            self.adjacency
                .entry(triple.object.clone())
                .or_default()
                .push(index);
        }

        *self.in_degree.entry(triple.object.clone()).or_insert(0) += 1;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sorted node labels.
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    /// Indices of every edge touching `label`, from either end.
    pub fn edges_at(&self, label: &str) -> &[usize] {
        self.adjacency.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes with no incoming edge, sorted. A fully cyclic graph has none;
    /// callers fall back to the whole graph in that case.
    pub fn root_nodes(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|label| self.in_degree.get(*label).copied().unwrap_or(0) == 0)
            .cloned()
            .collect()
    }

    /// Serializable view for callers that render the graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.node_ids(),
            edges: self
                .edges
                .iter()
                .map(|edge| EdgeSnapshot {
                    id: edge.id(),
                    source: edge.source.clone(),
                    predicate: edge.predicate.clone(),
                    target: edge.target.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub id: String,
    pub source: String,
    pub predicate: String,
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple {
            subject: s.to_string(),
            predicate: p.to_string(),
            object: o.to_string(),
        }
    }

    #[test]
    fn test_duplicate_triples_collapse() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triples(&[triple("a", "leads to", "b")]);
        graph.add_triples(&[triple("a", "leads to", "b")]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.in_degree.get("b"), Some(&1));
    }

    #[test]
    fn test_parallel_predicates_are_distinct_edges() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triples(&[
            triple("a", "likes", "b"),
            triple("a", "knows", "b"),
        ]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_roots_have_no_incoming_edges() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triples(&[
            triple("a", "leads to", "b"),
            triple("b", "leads to", "c"),
        ]);

        assert_eq!(graph.root_nodes(), vec!["a".to_string()]);
    }

    #[test]
    fn test_cyclic_graph_has_no_roots() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triples(&[
            triple("a", "leads to", "b"),
            triple("b", "leads to", "a"),
        ]);

        assert!(graph.root_nodes().is_empty());
    }

    #[test]
    fn test_self_loop_adjacency_is_recorded_once() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triples(&[triple("a", "references", "a")]);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edges_at("a").len(), 1);
        assert!(graph.root_nodes().is_empty());
    }

    #[test]
    fn test_snapshot_is_sorted_and_stable() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triples(&[
            triple("zebra", "eats", "grass"),
            triple("ant", "eats", "grass"),
        ]);

        let snapshot = graph.snapshot();
        assert_eq!(snapshot.nodes, vec!["ant", "grass", "zebra"]);
        assert_eq!(snapshot.edges[0].id, "zebra|eats|grass");
    }
}
