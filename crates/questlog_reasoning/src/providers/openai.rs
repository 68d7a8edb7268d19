//! OpenAI chat completions. Also serves any OpenAI-compatible endpoint
//! (DeepSeek, Ollama's `/v1`, llama.cpp server) through `base_url`.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::llm::{CompletionParams, LlmClient};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(model: &str, base_url: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let api_key = super::env_key("OPENAI_API_KEY");
        Self::with_api_key(model, base_url, api_key, timeout)
    }

    pub fn with_api_key(
        model: &str,
        base_url: Option<&str>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: super::http_client(timeout)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    #[tracing::instrument(skip(self, system, prompt, params), fields(model = %self.model))]
    async fn complete(&self, system: &str, prompt: &str, params: CompletionParams) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY is not set")?;

        // System prompt goes first as its own message
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to OpenAI")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API Error ({}): {}", status, error_text);
        }

        let resp_json: Value = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;
        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .context("OpenAI response has no message content")?;
        Ok(content.to_string())
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
