//! Completion provider trait — the abstraction over chat-completion backends.
//!
//! A provider sends one prompt to a chat-completion service and hands back the
//! raw reply **untyped**. The reply is untrusted input; interpreting it is the
//! job of [`crate::decision`], not of the transport.
//!
//! Implementations: OpenAI-compatible HTTP endpoint, canned mock response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of a chat-completion request.
///
/// Serializes to exactly `{"model": .., "messages": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-3.5-turbo")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// A request carrying a single user prompt.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

/// The core completion provider trait.
///
/// Every backend (live HTTP endpoint, canned response) implements this trait.
/// The pipeline calls `complete()` exactly once per run without knowing which
/// backend is being used.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a request and get the raw response object.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<serde_json::Value, ProviderError>;
}
