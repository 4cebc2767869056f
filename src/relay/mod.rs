//! The chat relay: forwards a conversation to the completion provider with
//! the travel-planner persona prepended, and extracts an embedded itinerary
//! from the reply.

mod itinerary;
mod persona;

pub use itinerary::{Activity, Itinerary, ItineraryDay, ItineraryOutcome, TravelerInfo};
pub use persona::{ITINERARY_END, ITINERARY_START, PERSONA};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CompletionConfig;
use crate::llm::{
    ChatRequest, CompletionProvider, LLMError, Message, OpenAICompatibleProvider, ROLE_SYSTEM,
};

/// Fixed generation parameters sent with every completion request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// The result of one relayed chat turn.
#[derive(Debug)]
pub struct ChatReply {
    /// Raw assistant text, markers included.
    pub message: String,
    /// Parsed itinerary, if the reply carried a well-formed block.
    pub itinerary: Option<Itinerary>,
}

/// Errors surfaced to the caller of [`ChatRelay::handle_chat`].
///
/// Itinerary parse failures are deliberately not represented here: they are
/// absorbed into a reply with no itinerary.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The completion API key was not configured at startup.
    #[error("completion API key is not configured")]
    MissingCredential,

    /// The upstream call failed (transport error or non-success status).
    #[error(transparent)]
    Llm(#[from] LLMError),

    /// The provider answered 200 but without an assistant message.
    #[error("completion response contained no choices")]
    MalformedResponse,
}

/// Stateless relay between the chat endpoint and the completion provider.
///
/// The provider, persona text, and generation parameters are fixed at
/// construction; each call is fully independent.
pub struct ChatRelay {
    provider: Option<Arc<dyn CompletionProvider>>,
    persona: String,
    params: GenerationParams,
}

impl ChatRelay {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        persona: String,
        params: GenerationParams,
    ) -> Self {
        Self {
            provider,
            persona,
            params,
        }
    }

    /// Build the relay from config, reading the API key from the environment
    /// variable the config names.
    ///
    /// A missing key does not prevent startup; every chat call will fail
    /// with [`RelayError::MissingCredential`] until the process is restarted
    /// with the key set.
    pub fn from_config(config: &CompletionConfig) -> Self {
        let provider: Option<Arc<dyn CompletionProvider>> =
            match std::env::var(&config.api_key_env) {
                Ok(key) => {
                    info!(base_url = %config.base_url, model = %config.model, "registered completion provider");
                    Some(Arc::new(OpenAICompatibleProvider::new(
                        config.base_url.clone(),
                        Some(key),
                    )))
                }
                Err(_) => {
                    warn!(
                        "{} is not set; chat requests will fail until it is provided",
                        config.api_key_env
                    );
                    None
                }
            };

        Self::new(
            provider,
            PERSONA.to_string(),
            GenerationParams {
                model: config.model.clone(),
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        )
    }

    /// Relay one conversation to the completion provider.
    ///
    /// Sends `[persona] ++ turns` in caller order, with no retry. The reply
    /// is scanned for an itinerary block; a block that fails to parse is
    /// logged and swallowed, never an error.
    pub async fn handle_chat(&self, turns: Vec<Message>) -> Result<ChatReply, RelayError> {
        let provider = self.provider.as_ref().ok_or(RelayError::MissingCredential)?;

        debug!(turns = turns.len(), "relaying conversation to completion provider");

        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(Message::new(ROLE_SYSTEM, self.persona.clone()));
        messages.extend(turns);

        let request = ChatRequest {
            model: self.params.model.clone(),
            messages,
            temperature: Some(self.params.temperature),
            max_tokens: Some(self.params.max_output_tokens),
            stream: false,
        };

        let response = provider.chat(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(RelayError::MalformedResponse)?;

        let preview: String = content.chars().take(100).collect();
        debug!(%preview, "received completion");

        let itinerary = match itinerary::extract(&content) {
            ItineraryOutcome::Parsed(itinerary) => {
                info!(destination = %itinerary.destination, "parsed itinerary from reply");
                Some(itinerary)
            }
            ItineraryOutcome::NotPresent => None,
            ItineraryOutcome::Malformed(err) => {
                warn!(error = %err, "itinerary block failed to parse; returning reply without it");
                None
            }
        };

        Ok(ChatReply {
            message: content,
            itinerary,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::{ChatResponse, Choice, ROLE_ASSISTANT, ROLE_USER};

    enum Behavior {
        Reply(String),
        Fail { status: u16, message: String },
        EmptyChoices,
    }

    struct FakeProvider {
        behavior: Behavior,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl FakeProvider {
        fn replying(reply: &str) -> Self {
            Self {
                behavior: Behavior::Reply(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16, message: &str) -> Self {
            Self {
                behavior: Behavior::Fail {
                    status,
                    message: message.to_string(),
                },
                seen: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self {
                behavior: Behavior::EmptyChoices,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
            self.seen.lock().unwrap().push(request);
            match &self.behavior {
                Behavior::Reply(reply) => Ok(ChatResponse {
                    id: "chatcmpl-test".to_string(),
                    choices: vec![Choice {
                        index: 0,
                        message: Message::new(ROLE_ASSISTANT, reply.clone()),
                        finish_reason: Some("stop".to_string()),
                    }],
                    usage: None,
                }),
                Behavior::Fail { status, message } => Err(LLMError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                Behavior::EmptyChoices => Ok(ChatResponse {
                    id: "chatcmpl-test".to_string(),
                    choices: Vec::new(),
                    usage: None,
                }),
            }
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            model: "llama3-70b-8192".to_string(),
            temperature: 0.7,
            max_output_tokens: 4000,
        }
    }

    fn relay_with(provider: Arc<FakeProvider>) -> ChatRelay {
        ChatRelay::new(Some(provider), "You plan trips.".to_string(), params())
    }

    #[tokio::test]
    async fn prepends_persona_and_preserves_turn_order() {
        let provider = Arc::new(FakeProvider::replying("Sounds great!"));
        let relay = relay_with(provider.clone());

        let turns = vec![
            Message::new(ROLE_USER, "I want to visit Lisbon"),
            Message::new(ROLE_ASSISTANT, "For how many days?"),
            Message::new(ROLE_USER, "Three"),
        ];
        relay.handle_chat(turns).await.unwrap();

        let seen = provider.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.model, "llama3-70b-8192");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(4000));
        assert!(!request.stream);

        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, ROLE_SYSTEM);
        assert_eq!(request.messages[0].content, "You plan trips.");
        assert_eq!(request.messages[1].content, "I want to visit Lisbon");
        assert_eq!(request.messages[2].role, ROLE_ASSISTANT);
        assert_eq!(request.messages[3].content, "Three");
    }

    #[tokio::test]
    async fn empty_conversation_sends_persona_only() {
        let provider = Arc::new(FakeProvider::replying("Where to?"));
        let relay = relay_with(provider.clone());

        let reply = relay.handle_chat(Vec::new()).await.unwrap();
        assert_eq!(reply.message, "Where to?");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(seen[0].messages[0].role, ROLE_SYSTEM);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_call() {
        let relay = ChatRelay::new(None, "You plan trips.".to_string(), params());

        let err = relay
            .handle_chat(vec![Message::new(ROLE_USER, "hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MissingCredential));

        let err = relay.handle_chat(Vec::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingCredential));
    }

    #[tokio::test]
    async fn upstream_error_passes_through_unretried() {
        let provider = Arc::new(FakeProvider::failing(429, "rate limit reached"));
        let relay = relay_with(provider.clone());

        let err = relay
            .handle_chat(vec![Message::new(ROLE_USER, "hi")])
            .await
            .unwrap_err();
        match err {
            RelayError::Llm(LLMError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limit reached");
            }
            other => panic!("expected api error, got {other:?}"),
        }

        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_choices_is_malformed_response() {
        let relay = relay_with(Arc::new(FakeProvider::empty()));

        let err = relay
            .handle_chat(vec![Message::new(ROLE_USER, "hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::MalformedResponse));
    }

    #[tokio::test]
    async fn reply_with_itinerary_block_parses_it() {
        let reply = r#"Here you go! ITINERARY_START{"destination":"Paris, France","duration":3,"travelerInfo":{"budget":"Mid-range","preferences":["Food"]},"days":[]}ITINERARY_END Bon voyage!"#;
        let relay = relay_with(Arc::new(FakeProvider::replying(reply)));

        let result = relay
            .handle_chat(vec![Message::new(ROLE_USER, "plan it")])
            .await
            .unwrap();

        assert_eq!(result.message, reply);
        let itinerary = result.itinerary.expect("itinerary should parse");
        assert_eq!(itinerary.destination, "Paris, France");
        assert_eq!(itinerary.duration, 3);
    }

    #[tokio::test]
    async fn reply_without_markers_has_no_itinerary() {
        let relay = relay_with(Arc::new(FakeProvider::replying("What's your budget?")));

        let result = relay
            .handle_chat(vec![Message::new(ROLE_USER, "plan it")])
            .await
            .unwrap();

        assert_eq!(result.message, "What's your budget?");
        assert!(result.itinerary.is_none());
    }

    #[tokio::test]
    async fn malformed_block_is_swallowed() {
        let reply = "ITINERARY_START{oops}ITINERARY_END";
        let relay = relay_with(Arc::new(FakeProvider::replying(reply)));

        let result = relay
            .handle_chat(vec![Message::new(ROLE_USER, "plan it")])
            .await
            .unwrap();

        assert_eq!(result.message, reply);
        assert!(result.itinerary.is_none());
    }
}
