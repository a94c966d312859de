use anyhow::{Context, Result};
use graph::{DEFAULT_MAX_DEPTH, KnowledgeGraph, Subgraph, traverse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::QueryLLM;
use crate::selection::{RootSelection, build_selection_prompt, parse_root_selection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphAnswer {
    pub answer: String,
    /// Node/edge ids the traversal touched, for caller-side highlighting.
    pub visited_node_ids: Vec<String>,
    pub visited_edge_ids: Vec<String>,
    pub trace: AnswerTrace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerTrace {
    pub roots_total: usize,
    pub roots_selected: usize,
    pub selection_fallback: bool,
    pub full_graph_fallback: bool,
    pub nodes_visited: usize,
    pub edges_visited: usize,
}

pub struct Retriever {
    llm: QueryLLM,
    max_depth: usize,
}

impl Retriever {
    pub fn new(llm: QueryLLM, max_depth: usize) -> Self {
        Self { llm, max_depth }
    }

    pub fn default() -> Self {
        Self::new(QueryLLM::default(), DEFAULT_MAX_DEPTH)
    }

    /// Answer a question against an accumulated graph.
    ///
    /// Root selection fails open and an edgeless traversal falls back to the
    /// whole graph; only the final answer-generation call can fail.
    pub async fn answer(&self, question: &str, graph: &KnowledgeGraph) -> Result<GraphAnswer> {
        // Step 1: candidate entry points
        let roots = graph.root_nodes();

        // Step 2: ask the model which roots matter for this question
        let selection = if roots.is_empty() {
            RootSelection::Fallback(Vec::new())
        } else {
            self.select_roots(question, &roots).await
        };

        // Step 3: bounded multi-source BFS from the selected roots
        let mut subgraph = traverse(graph, selection.roots(), self.max_depth);

        // Step 4: an edgeless subgraph answers nothing, use the whole graph
        let mut full_graph_fallback = false;
        if !subgraph.has_edges() {
            subgraph = Subgraph::full(graph);
            full_graph_fallback = true;
        }

        // Step 5: generate the answer from the subgraph's relationships
        let prompt = build_answer_prompt(question, &subgraph);
        let answer = self
            .llm
            .answer(&prompt)
            .await
            .context("Answer generation failed")?;

        Ok(GraphAnswer {
            answer,
            visited_node_ids: subgraph.node_ids(),
            visited_edge_ids: subgraph.edge_ids(),
            trace: AnswerTrace {
                roots_total: roots.len(),
                roots_selected: selection.roots().len(),
                selection_fallback: selection.is_fallback(),
                full_graph_fallback,
                nodes_visited: subgraph.nodes.len(),
                edges_visited: subgraph.edges.len(),
            },
        })
    }

    async fn select_roots(&self, question: &str, roots: &[String]) -> RootSelection {
        let prompt = build_selection_prompt(question, roots);

        match self.llm.select(&prompt).await {
            Ok(raw) => parse_root_selection(&raw, roots),
            Err(e) => {
                warn!(error = %e, "Root selection call failed, keeping all roots");
                RootSelection::Fallback(roots.to_vec())
            }
        }
    }
}

/// One bulleted line per relationship, in graph insertion order.
pub fn format_relationship_lines(subgraph: &Subgraph) -> String {
    subgraph
        .edges
        .iter()
        .map(|edge| format!("- {} -[{}]-> {}", edge.source, edge.predicate, edge.target))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_answer_prompt(question: &str, subgraph: &Subgraph) -> String {
    let mut relationships = format_relationship_lines(subgraph);
    if relationships.is_empty() {
        relationships = "(none)".to_string();
    }

    format!(
        r#"You are answering a question using a knowledge graph.

KNOWN RELATIONSHIPS:
{}

USER QUESTION: {}

INSTRUCTIONS:
- Answer using only the relationships listed above
- If the relationships do not contain the answer, say the knowledge graph does not contain it
- Keep the answer concise and factual

ANSWER:"#,
        relationships, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::Triple;

    fn graph_from(triples: &[(&str, &str, &str)]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        let owned: Vec<Triple> = triples
            .iter()
            .map(|(s, p, o)| Triple {
                subject: s.to_string(),
                predicate: p.to_string(),
                object: o.to_string(),
            })
            .collect();
        graph.add_triples(&owned);
        graph
    }

    #[test]
    fn test_relationship_lines_follow_insertion_order() {
        let graph = graph_from(&[("a", "leads to", "b"), ("b", "leads to", "c")]);
        let lines = format_relationship_lines(&Subgraph::full(&graph));

        assert_eq!(lines, "- a -[leads to]-> b\n- b -[leads to]-> c");
    }

    #[test]
    fn test_empty_subgraph_prompt_says_none() {
        let graph = KnowledgeGraph::new();
        let prompt = build_answer_prompt("what is there?", &Subgraph::full(&graph));

        assert!(prompt.contains("(none)"));
        assert!(prompt.contains("what is there?"));
    }
}
