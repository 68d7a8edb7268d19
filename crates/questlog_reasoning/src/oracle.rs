//! The oracle: an [`Advisor`] backed by a language model.
//!
//! One request per consultation. Failures are logged and replaced by a fixed
//! in-character line; callers never see an error.

use async_trait::async_trait;
use questlog_core::{Advisor, ProgressSnapshot};
use std::sync::Arc;

use crate::llm::{CompletionParams, LlmClient};
use crate::prompts::{oracle_prompt, ORACLE_SYSTEM};

pub const FALLBACK_MESSAGE: &str =
    "Connection to the arcane realm (API) is unstable. Your deeds are still recorded.";
pub const SILENT_MESSAGE: &str =
    "The spirits are silent today... keep pushing forward, adventurer.";

pub struct Oracle {
    client: Arc<dyn LlmClient>,
    params: CompletionParams,
}

impl Oracle {
    pub fn new(client: Arc<dyn LlmClient>, params: CompletionParams) -> Self {
        Self { client, params }
    }
}

#[async_trait]
impl Advisor for Oracle {
    async fn advise(&self, snapshot: &ProgressSnapshot) -> String {
        let prompt = oracle_prompt(snapshot);
        match self
            .client
            .complete(ORACLE_SYSTEM, &prompt, self.params.clone())
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("{} returned an empty answer", self.client.name());
                SILENT_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!("{} error: {:#}", self.client.name(), e);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
