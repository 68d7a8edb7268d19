pub mod anthropic;
pub mod gemini;
pub mod mock;
pub mod openai;

use anyhow::Result;
use questlog_core::config::LlmConfig;
use std::sync::Arc;
use std::time::Duration;

use crate::llm::LlmClient;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use mock::MockProvider;
pub use openai::OpenAiClient;

/// Build the client named by `cfg.provider`.
pub fn create_client(cfg: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let timeout = cfg.timeout_secs.map(Duration::from_secs);
    let base_url = cfg.base_url.as_deref();
    let client: Arc<dyn LlmClient> = match cfg.provider.as_str() {
        "gemini" => Arc::new(GeminiClient::new(&cfg.model, base_url, timeout)?),
        "anthropic" => Arc::new(AnthropicClient::new(&cfg.model, base_url, timeout)?),
        "openai" => Arc::new(OpenAiClient::new(&cfg.model, base_url, timeout)?),
        "mock" => Arc::new(MockProvider::new(&cfg.model)),
        other => anyhow::bail!(
            "Unknown LLM provider '{}' (expected gemini, anthropic, openai or mock)",
            other
        ),
    };
    tracing::info!("Oracle provider: {} ({})", client.name(), cfg.model);
    Ok(client)
}

/// Shared HTTP client construction. No timeout unless one is configured.
fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    Ok(builder.build()?)
}

/// Read an API key, treating empty values as absent.
fn env_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
