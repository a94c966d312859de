use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::prompt;

/// Extraction runs cool so the model sticks to facts present in the chunk.
const EXTRACTION_TEMPERATURE: f32 = 0.2;

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>, // "json" for structured output
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            model,
            client: reqwest::Client::new(),
        }
    }

    pub fn default() -> Self {
        Self::new(
            "http://localhost:11434".to_string(),
            "llama3".to_string(),
        )
    }

    /// Non-streamed chat completion with a fixed system instruction and the
    /// chunk text as user content, forced into JSON output mode.
    pub async fn extract(&self, system: &str, user: &str) -> Result<String> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ];
        self.chat(messages, Some("json".to_string()), None).await
    }

    /// Like [`extract`](Self::extract), but re-asks the model with a
    /// correction prompt when the completion is not valid JSON.
    pub async fn extract_json_with_retry(
        &self,
        system: &str,
        user: &str,
        max_retries: usize,
    ) -> Result<String> {
        for attempt in 0..max_retries {
            let response = self.extract(system, user).await?;

            if serde_json::from_str::<serde_json::Value>(&response).is_ok() {
                return Ok(response);
            }

            warn!(attempt = attempt + 1, "Model returned invalid JSON, asking for a fix");

            if attempt < max_retries - 1 {
                let retry_prompt = prompt::build_retry_prompt(&response);
                let corrected = self
                    .chat(
                        vec![ChatMessage {
                            role: "user".to_string(),
                            content: retry_prompt,
                        }],
                        Some("json".to_string()),
                        None,
                    )
                    .await?;
                if serde_json::from_str::<serde_json::Value>(&corrected).is_ok() {
                    return Ok(corrected);
                }
            }
        }

        anyhow::bail!("Failed to get valid JSON after {} retries", max_retries)
    }

    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        format: Option<String>,
        num_predict: Option<u32>,
    ) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            format,
            options: ChatOptions {
                temperature: EXTRACTION_TEMPERATURE,
                num_predict,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama request failed: {}", response.status());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(chat_response.message.content)
    }
}
