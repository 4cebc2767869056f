//! Completion provider trait.

use async_trait::async_trait;

use super::error::LLMError;
use super::types::{ChatRequest, ChatResponse};

/// Trait for chat completion providers.
///
/// The relay only depends on this trait, so tests can inject a fake provider
/// instead of making real network calls.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Make a chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError>;
}
