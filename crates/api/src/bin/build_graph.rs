use anyhow::Result;
use extract::Extractor;
use ingest::{ChunkerConfig, FileReader};
use pipeline::GraphPipeline;
use query::Retriever;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let Some(arg) = std::env::args().nth(1) else {
        anyhow::bail!("Usage: build_graph <file.txt|file.md|directory> [question]");
    };
    let question = std::env::args().nth(2);

    let path = PathBuf::from(&arg);
    let content = if path.is_dir() {
        FileReader::read_directory(&path).await?
    } else {
        FileReader::read_file(&path).await?
    };

    let pipeline = GraphPipeline::new(Extractor::default(), ChunkerConfig::default());

    let (tx, mut rx) = mpsc::channel(32);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Ok(line) = serde_json::to_string(&event) {
                println!("{line}");
            }
        }
    });

    let graph = pipeline.build(&content, &tx).await;
    drop(tx);
    printer.await?;

    println!();
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());

    let roots = graph.root_nodes();
    println!("Roots: {}", roots.len());
    for root in &roots {
        println!("  - {root}");
    }

    if let Some(question) = question {
        let retriever = Retriever::default();
        let result = retriever.answer(&question, &graph).await?;

        println!();
        println!("Q: {question}");
        println!("A: {}", result.answer.trim());
        println!(
            "(visited {} nodes, {} edges{})",
            result.trace.nodes_visited,
            result.trace.edges_visited,
            if result.trace.full_graph_fallback {
                ", full-graph fallback"
            } else {
                ""
            }
        );
    }

    Ok(())
}
