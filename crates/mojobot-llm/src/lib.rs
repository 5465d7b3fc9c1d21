//! Bedrock provider clients for mojobot.
//!
//! - [`BedrockChatClient`] implements [`mojobot_core::ChatModel`] on the Converse API
//! - [`BedrockKnowledgeBase`] implements [`mojobot_core::KnowledgeBase`] on the
//!   Knowledge Bases `Retrieve` API
//!
//! Both talk plain JSON over HTTPS with `reqwest`. Requests are signed with
//! SigV4 from the AWS default credential chain, or carry a Bedrock API key
//! when one is configured (see [`BedrockAuth`]).

mod auth;
mod converse;
mod retrieve;

pub use auth::BedrockAuth;
pub use converse::BedrockChatClient;
pub use retrieve::BedrockKnowledgeBase;

/// Reads an error body for logging, capped so provider HTML pages don't flood the logs.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    const MAX_ERROR_BODY: usize = 512;
    let body = response.text().await.unwrap_or_default();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body,
    }
}
