use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One extracted fact. Fields are normalized (lowercase, trimmed) before a
/// triple enters the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Raw model output for a single triple. Missing fields default to empty
/// strings so they are dropped later instead of failing the whole batch.
#[derive(Debug, Deserialize)]
pub struct RawTriple {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub predicate: String,
    #[serde(default)]
    pub object: String,
}

/// Parse a model completion as a JSON array of triples.
///
/// Models routinely wrap JSON in markdown code fences even when told not to,
/// so fences are stripped before parsing. Anything that still fails to parse
/// as an array is an error for this chunk.
pub fn parse_triples(raw: &str) -> Result<Vec<RawTriple>> {
    let cleaned = strip_code_fences(raw);

    serde_json::from_str::<Vec<RawTriple>>(cleaned)
        .context("Model output is not a JSON array of triples")
}

/// Drop a surrounding markdown code fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}
