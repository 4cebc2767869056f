//! Chat HTTP handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::llm::{LLMError, Message};
use crate::relay::{Itinerary, RelayError};
use crate::response;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct ChatApiRequest {
    /// A missing `messages` key is an empty conversation, which is valid.
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Serialize)]
pub struct ChatApiResponse {
    message: String,
    /// Explicit `null` when no itinerary was produced.
    itinerary: Option<Itinerary>,
}

/// POST /api/chat
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatApiRequest>) -> Response {
    match state.relay.handle_chat(req.messages).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ChatApiResponse {
                message: reply.message,
                itinerary: reply.itinerary,
            }),
        )
            .into_response(),

        Err(RelayError::MissingCredential) => {
            error!("chat request rejected: completion API key is not configured");
            response::internal_error("completion API key is not configured").into_response()
        }

        Err(RelayError::Llm(LLMError::Api { status, message })) => {
            error!(status, "completion API returned an error");
            response::upstream_error(status, format!("completion API error: {message}"))
                .into_response()
        }

        Err(err @ (RelayError::Llm(LLMError::Request(_)) | RelayError::MalformedResponse)) => {
            error!(error = %err, "failed to process chat request");
            response::internal_error(format!("failed to process chat request: {err}"))
                .into_response()
        }
    }
}
