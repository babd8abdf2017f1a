use async_trait::async_trait;

use crate::types::{ChatRequest, CompletionError};

/// Common trait for chat-completion backends
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Send one request and return `choices[0].message.content`
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError>;
}
