//! Core domain types and provider traits for mojobot.
//!
//! This crate provides the types shared across the mojobot workspace:
//!
//! - [`AgentError`] — Error type for retrieval and completion calls
//! - [`Message`] and [`MessageRole`] — Role-tagged chat messages
//! - [`RetrievedPassage`] — A ranked passage returned by a knowledge base
//! - [`Completion`] and [`CompletionMetrics`] — Output of a chat model call
//! - [`ChatModel`] and [`KnowledgeBase`] — Seams for the external providers
//!
//! # Example
//!
//! ```rust
//! use mojobot_core::{Message, MessageRole};
//!
//! let messages = vec![
//!     Message::system("You are a cat."),
//!     Message::user("How are you?"),
//! ];
//!
//! assert_eq!(messages[0].role, MessageRole::System);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the model or knowledge base providers.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Chat completion request failed.
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// Knowledge base retrieval request failed.
    #[error("Retrieval failed: {0}")]
    RetrievalError(String),

    /// Provider returned a body that could not be interpreted.
    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    /// Provider response had no output message at all.
    #[error("Model response contained no message")]
    MissingMessage,
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::ParseError(err.to_string())
    }
}

/// Role of a message in the conversation sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions establishing the assistant's persona.
    System,
    /// The caller's prompt.
    User,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }
}

/// A passage returned by a knowledge base query, in provider rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text. May be empty when the provider returned no content.
    pub text: String,
    /// Location of the source document, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Relevance score assigned by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    /// Returns true when the passage has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Token usage and latency for a single completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Text produced by a chat model plus call metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub metrics: CompletionMetrics,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), metrics: CompletionMetrics::default() }
    }
}

/// A hosted chat model that turns an ordered message list into a single reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier of the model this client targets.
    fn model_id(&self) -> &str;

    /// Requests one non-streaming, plain-text completion.
    async fn complete(&self, messages: &[Message]) -> Result<Completion, AgentError>;
}

/// A managed knowledge base answering free-text queries with ranked passages.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Retrieves at most `top_k` passages for `query` from `knowledge_base_id`.
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: u32,
    ) -> Result<Vec<RetrievedPassage>, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::system("persona")).unwrap();
        assert_eq!(json["role"], "system");

        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_passage_is_empty() {
        assert!(RetrievedPassage::new("").is_empty());
        assert!(RetrievedPassage::default().is_empty());
        assert!(!RetrievedPassage::new("  \n").is_empty());
        assert!(!RetrievedPassage::new("Mojo likes ballet.").is_empty());
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: AgentError = serde_json::from_str::<Message>("{").unwrap_err().into();
        assert!(matches!(err, AgentError::ParseError(_)));
        assert!(err.to_string().starts_with("Failed to parse provider response"));
    }
}
