//! LLM provider client for chat completions.

mod error;
mod openai;
mod provider;
mod types;

pub use error::LLMError;
pub use openai::OpenAICompatibleProvider;
pub use provider::CompletionProvider;
pub use types::{ChatRequest, ChatResponse, Choice, Message, Usage};
pub use types::{ROLE_ASSISTANT, ROLE_SYSTEM, ROLE_USER};
