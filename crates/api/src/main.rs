mod cache;
mod config;
mod metrics;
mod retry;
mod sessions;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use extract::{Extractor, OllamaClient};
use futures::StreamExt;
use ingest::ChunkerConfig;
use pipeline::{GraphPipeline, ProgressEvent};
use query::{GraphAnswer, QueryLLM, Retriever};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::cache::AnswerCache;
use crate::config::AppConfig;
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};
use crate::retry::RetryPolicy;
use crate::sessions::SessionStore;

struct AppState {
    config: AppConfig,
    sessions: SessionStore,
    cache: AnswerCache,
    metrics: Arc<Metrics>,
    retriever: Retriever,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct CreateGraphRequest {
    text: String,
    chunk_size: Option<usize>,
    overlap_fraction: Option<f64>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    #[serde(flatten)]
    result: GraphAnswer,
    cached: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    ollama: String,
}

#[derive(Serialize)]
struct StatsResponse {
    metrics: MetricsSnapshot,
    open_sessions: usize,
    cached_answers: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let retriever = Retriever::new(
        QueryLLM::new(config.llm.base_url.clone(), config.llm.query_model.clone()),
        config.retrieval.max_depth,
    );

    let state = Arc::new(AppState {
        sessions: SessionStore::new(),
        cache: AnswerCache::new(&config.cache),
        metrics: Metrics::new(),
        retry: RetryPolicy::from_config(&config.retry),
        retriever,
        config,
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/graphs", post(create_graph))
        .route("/graphs/:id", get(get_graph).delete(delete_graph))
        .route("/graphs/:id/ask", post(ask_question))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr)
        .await
        .expect("Failed to bind listener");

    info!("Server listening on http://{}", state.config.bind_addr);

    axum::serve(listener, app).await.unwrap();
}

/// Build a graph for one document, streaming progress as SSE. The final
/// `graph_ready` event carries the session id for follow-up questions.
async fn create_graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGraphRequest>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let (tx_json, rx_json) = mpsc::channel::<serde_json::Value>(32);

    let app = state.clone();
    tokio::spawn(async move {
        let chunker_config = ChunkerConfig::new(
            req.chunk_size.unwrap_or(app.config.chunking.chunk_size),
            req.overlap_fraction
                .unwrap_or(app.config.chunking.overlap_fraction),
        );
        let extractor = Extractor::new(OllamaClient::new(
            app.config.llm.base_url.clone(),
            app.config.llm.extract_model.clone(),
        ));
        let pipeline = GraphPipeline::new(extractor, chunker_config);

        let (tx_ev, mut rx_ev) = mpsc::channel::<ProgressEvent>(32);
        let timer = TimedOperation::start();

        // A dropped SSE client closes tx_json, which closes rx_ev, which in
        // turn stops the build on its next event send.
        let build = async {
            let tx_ev = tx_ev;
            pipeline.build(&req.text, &tx_ev).await
        };

        let forward = async {
            while let Some(event) = rx_ev.recv().await {
                match &event {
                    ProgressEvent::ChunkExtracted { triples, .. } => {
                        app.metrics.record_chunk(true, triples.len());
                    }
                    ProgressEvent::ChunkFailed { .. } => {
                        app.metrics.record_chunk(false, 0);
                    }
                    ProgressEvent::Done { .. } => {}
                }

                let Ok(value) = serde_json::to_value(&event) else {
                    continue;
                };
                if tx_json.send(value).await.is_err() {
                    break;
                }
            }
        };

        let (graph, _) = tokio::join!(build, forward);
        app.metrics.record_build(timer.elapsed());

        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let graph_id = app.sessions.insert(graph);

        let ready = serde_json::json!({
            "type": "graph_ready",
            "graph_id": graph_id,
            "node_count": node_count,
            "edge_count": edge_count,
        });
        if tx_json.send(ready).await.is_err() {
            info!(%graph_id, "Client disconnected before the graph was ready, dropping session");
            app.sessions.remove(&graph_id);
        }
    });

    let stream = ReceiverStream::new(rx_json).filter_map(|value| async move {
        let name = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("message")
            .to_string();
        Event::default()
            .event(name)
            .json_data(&value)
            .ok()
            .map(Ok::<_, Infallible>)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn ask_question(
    State(state): State<Arc<AppState>>,
    Path(graph_id): Path<Uuid>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, StatusCode> {
    let Some(graph) = state.sessions.get(&graph_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    if let Some(hit) = state.cache.get(&graph_id, &req.question) {
        return Ok(Json(AskResponse {
            result: hit,
            cached: true,
        }));
    }

    let timer = TimedOperation::start();
    let result = state
        .retry
        .run("answer_question", || {
            state.retriever.answer(&req.question, &graph)
        })
        .await;

    match result {
        Ok(answer) => {
            state.metrics.record_question(true, timer.elapsed());
            state.cache.set(&graph_id, &req.question, answer.clone());
            Ok(Json(AskResponse {
                result: answer,
                cached: false,
            }))
        }
        Err(e) => {
            state.metrics.record_question(false, timer.elapsed());
            error!(%graph_id, error = %e, "Question answering failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(graph_id): Path<Uuid>,
) -> Result<Json<graph::GraphSnapshot>, StatusCode> {
    let Some(graph) = state.sessions.get(&graph_id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    Ok(Json(graph.snapshot()))
}

async fn delete_graph(
    State(state): State<Arc<AppState>>,
    Path(graph_id): Path<Uuid>,
) -> StatusCode {
    if state.sessions.remove(&graph_id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ollama_status = match reqwest::get(&state.config.llm.base_url).await {
        Ok(resp) if resp.status().is_success() => "ok".to_string(),
        Ok(resp) => format!("error: status {}", resp.status()),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        ollama: ollama_status,
    })
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        metrics: state.metrics.snapshot(),
        open_sessions: state.sessions.len(),
        cached_answers: state.cache.len(),
    })
}
