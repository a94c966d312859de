pub mod llm;
pub mod normalizer;
pub mod prompt;
pub mod schema;

pub use llm::OllamaClient;
pub use normalizer::TripleNormalizer;
pub use schema::{RawTriple, Triple};

use anyhow::{Context, Result};

const JSON_RETRIES: usize = 3;

pub struct Extractor {
    llm_client: OllamaClient,
    normalizer: TripleNormalizer,
}

impl Extractor {
    pub fn new(llm_client: OllamaClient) -> Self {
        Self {
            llm_client,
            normalizer: TripleNormalizer::new(),
        }
    }

    pub fn default() -> Self {
        Self::new(OllamaClient::default())
    }

    /// Extract normalized triples from one chunk of text.
    ///
    /// Triples with an empty field after normalization are dropped silently;
    /// a network or parse failure is an error for this chunk only and the
    /// caller is expected to continue with the next one.
    pub async fn extract_from_text(&self, text: &str) -> Result<Vec<Triple>> {
        let raw = self
            .llm_client
            .extract_json_with_retry(prompt::EXTRACTION_INSTRUCTIONS, text, JSON_RETRIES)
            .await
            .context("Extraction call failed")?;

        let parsed = schema::parse_triples(&raw)?;

        let triples = parsed
            .iter()
            .filter_map(|raw| self.normalizer.normalize(raw))
            .collect();

        Ok(triples)
    }
}
