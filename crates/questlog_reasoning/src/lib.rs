pub mod api_types;
pub mod llm;
pub mod oracle;
pub mod prompts;
pub mod providers;

pub use llm::{CompletionParams, LlmClient};
pub use oracle::{Oracle, FALLBACK_MESSAGE, SILENT_MESSAGE};
pub use providers::create_client;
