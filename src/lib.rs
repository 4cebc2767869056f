//! Itinera - a travel-planner chat backend that relays conversations to an
//! LLM completion API and extracts structured itineraries from replies.

pub mod config;
pub mod handlers;
pub mod llm;
pub mod relay;
pub mod response;
pub mod server;
