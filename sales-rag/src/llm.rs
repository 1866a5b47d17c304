//! Chat model trait used to generate grounded answers.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that turns a composed prompt into an answer.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, used in logs.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
