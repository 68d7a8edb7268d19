use anyhow::Result;
use async_trait::async_trait;
use questlog_core::config::LlmConfig;

/// Parameters for a single completion.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.9,
        }
    }
}

impl From<&LlmConfig> for CompletionParams {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature.clamp(0.0, 2.0),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One-shot text completion. Returns the model's text, possibly empty.
    async fn complete(&self, system: &str, prompt: &str, params: CompletionParams) -> Result<String>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
