use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub llm: LlmConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub extract_model: String,
    pub query_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            llm: LlmConfig {
                base_url: "http://localhost:11434".to_string(),
                extract_model: "llama3".to_string(),
                query_model: "llama3".to_string(),
            },
            chunking: ChunkingConfig {
                chunk_size: 5000,
                overlap_fraction: 0.10,
            },
            retrieval: RetrievalConfig {
                max_depth: graph::DEFAULT_MAX_DEPTH,
            },
            retry: RetryConfig {
                max_retries: 3,
                initial_backoff_ms: 1000,
                max_backoff_ms: 10000,
            },
            cache: CacheConfig {
                enabled: true,
                max_entries: 10000,
            },
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_parse::<String>("KG_BIND_ADDR") {
            config.bind_addr = value;
        }
        if let Some(value) = env_parse::<String>("KG_OLLAMA_URL") {
            config.llm.base_url = value;
        }
        if let Some(value) = env_parse::<String>("KG_EXTRACT_MODEL") {
            config.llm.extract_model = value;
        }
        if let Some(value) = env_parse::<String>("KG_QUERY_MODEL") {
            config.llm.query_model = value;
        }
        if let Some(value) = env_parse::<usize>("KG_CHUNK_SIZE") {
            config.chunking.chunk_size = value;
        }
        if let Some(value) = env_parse::<f64>("KG_OVERLAP_FRACTION") {
            config.chunking.overlap_fraction = value;
        }
        if let Some(value) = env_parse::<usize>("KG_MAX_DEPTH") {
            config.retrieval.max_depth = value;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, raw, "Ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_contracts() {
        let config = AppConfig::default();

        assert_eq!(config.chunking.chunk_size, 5000);
        assert_eq!(config.chunking.overlap_fraction, 0.10);
        assert_eq!(config.retrieval.max_depth, 3);
        assert!(config.cache.enabled);
    }
}
