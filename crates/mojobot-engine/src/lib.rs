//! Invocation pipeline for mojobot: retrieve context, assemble the prompt,
//! ask the chat model.

mod persona;

use std::sync::Arc;

use mojobot_core::{AgentError, ChatModel, Completion, KnowledgeBase, Message, RetrievedPassage};
use tracing::{debug, info, warn};

pub use persona::PERSONA_PROMPT;

/// Number of passages requested from the knowledge base per prompt.
pub const RETRIEVAL_TOP_K: u32 = 3;

/// Separator placed between retrieved passages.
pub const PASSAGE_DELIMITER: &str = "\n\n";

/// Line introducing retrieved context inside the system prompt.
pub const CONTEXT_HEADER: &str =
    "\n\nUse the following context from the knowledge base when it is relevant:\n\n";

// ─────────────────────────────────────────────────────────────────────────────
// Context Retrieval
// ─────────────────────────────────────────────────────────────────────────────

/// Concatenates non-empty passage texts in the order given.
pub fn join_passages(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PASSAGE_DELIMITER)
}

/// Looks up context for `query`.
///
/// Returns an empty string without calling the provider when no knowledge base
/// is configured. Provider failures are logged and also yield an empty string.
pub async fn retrieve_context(
    knowledge_base: &dyn KnowledgeBase,
    knowledge_base_id: Option<&str>,
    query: &str,
) -> String {
    let Some(kb_id) = knowledge_base_id else {
        return String::new();
    };

    match knowledge_base.retrieve(kb_id, query, RETRIEVAL_TOP_K).await {
        Ok(passages) => {
            debug!("Knowledge base {} returned {} passages", kb_id, passages.len());
            join_passages(&passages)
        }
        Err(e) => {
            warn!("Knowledge base retrieval failed, continuing without context: {}", e);
            String::new()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompt Assembly
// ─────────────────────────────────────────────────────────────────────────────

pub fn build_system_prompt(persona: &str, context: &str) -> String {
    match context.is_empty() {
        true => persona.to_string(),
        false => format!("{persona}{CONTEXT_HEADER}{context}"),
    }
}

/// Builds the two-message conversation: system first, then the user prompt.
pub fn build_messages(persona: &str, context: &str, prompt: &str) -> Vec<Message> {
    vec![
        Message::system(build_system_prompt(persona, context)),
        Message::user(prompt),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────────────────────────────────────

/// Answers prompts in character, optionally grounded in a knowledge base.
pub struct Agent {
    chat: Arc<dyn ChatModel>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    knowledge_base_id: Option<String>,
}

impl Agent {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        knowledge_base_id: Option<String>,
    ) -> Self {
        Self {
            chat,
            knowledge_base,
            knowledge_base_id,
        }
    }

    pub fn model_id(&self) -> &str {
        self.chat.model_id()
    }

    /// Runs one prompt through retrieval and completion.
    ///
    /// Retrieval problems never fail the call; completion errors are returned as-is.
    pub async fn invoke(&self, prompt: &str) -> Result<Completion, AgentError> {
        let context = retrieve_context(
            self.knowledge_base.as_ref(),
            self.knowledge_base_id.as_deref(),
            prompt,
        )
        .await;

        let messages = build_messages(PERSONA_PROMPT, &context, prompt);
        debug!(
            "Invoking {} with {} messages (context: {} chars)",
            self.chat.model_id(),
            messages.len(),
            context.len()
        );

        let completion = self.chat.complete(&messages).await?;

        info!(
            model = %self.chat.model_id(),
            input_tokens = completion.metrics.input_tokens,
            output_tokens = completion.metrics.output_tokens,
            elapsed_ms = completion.metrics.elapsed_ms,
            "Completion finished"
        );

        Ok(completion)
    }
}
