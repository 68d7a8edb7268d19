//! Offline oracle voice. Answers after a short pause so the loading state
//! is visible, and needs no key or network.

use crate::llm::{CompletionParams, LlmClient};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    async fn complete(&self, _system: &str, prompt: &str, _params: CompletionParams) -> Result<String> {
        tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        Ok(format!(
            "(Mock {} Response) The guild has read your report of {} words. Carry on, adventurer.",
            self.model,
            prompt.split_whitespace().count()
        ))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
