use async_trait::async_trait;

use super::{error::LlmError, types::TextResponse};

/// Anything that can turn a prompt into model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<TextResponse, LlmError>;
}
