use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Both query-side calls run cool; answers are additionally length-bounded.
const QUERY_TEMPERATURE: f32 = 0.2;
const ANSWER_MAX_TOKENS: u32 = 512;

#[derive(Clone)]
pub struct QueryLLM {
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
    format: Option<String>,
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

impl QueryLLM {
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

    /// Root-selection call: single user message, JSON output mode.
    pub async fn select(&self, prompt: &str) -> Result<String> {
        self.chat(prompt, Some("json".to_string()), None).await
    }

    /// Answer-generation call: single user message, free text, bounded length.
    pub async fn answer(&self, prompt: &str) -> Result<String> {
        self.chat(prompt, None, Some(ANSWER_MAX_TOKENS)).await
    }

    async fn chat(
        &self,
        prompt: &str,
        format: Option<String>,
        num_predict: Option<u32>,
    ) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            format,
            options: ChatOptions {
                temperature: QUERY_TEMPERATURE,
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
