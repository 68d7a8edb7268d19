use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::api_types::{Message, MessagesRequest, MessagesResponse};
use crate::llm::{CompletionParams, LlmClient};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(model: &str, base_url: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let api_key = super::env_key("ANTHROPIC_API_KEY");
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
            .or_else(|| std::env::var("ANTHROPIC_BASE_URL").ok())
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
impl LlmClient for AnthropicClient {
    #[tracing::instrument(skip(self, system, prompt, params), fields(model = %self.model))]
    async fn complete(&self, system: &str, prompt: &str, params: CompletionParams) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("ANTHROPIC_API_KEY is not set")?;

        let request_body = MessagesRequest {
            model: self.model.clone(),
            system: (!system.is_empty()).then(|| system.to_string()),
            messages: vec![Message::user(prompt)],
            max_tokens: params.max_tokens,
            temperature: Some(params.temperature.min(1.0)),
        };

        tracing::debug!(
            "LLM params: max_tokens={}, temperature={:.2}",
            params.max_tokens,
            params.temperature
        );

        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to Anthropic")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API Error ({}): {}", status, error_text);
        }

        let resp_text = response.text().await?;
        tracing::debug!(
            "Anthropic raw response (first 500 chars): {}",
            resp_text.chars().take(500).collect::<String>()
        );
        let api_response: MessagesResponse =
            serde_json::from_str(&resp_text).context("Failed to parse Anthropic response")?;
        Ok(api_response.text())
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
