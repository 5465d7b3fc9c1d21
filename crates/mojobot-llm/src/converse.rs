//! Bedrock Converse API client.

use std::time::Instant;

use async_trait::async_trait;
use mojobot_core::{AgentError, ChatModel, Completion, CompletionMetrics, Message, MessageRole};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{error_body, BedrockAuth};

#[derive(Serialize)]
struct TextBlock<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct ConverseMessage<'a> {
    role: &'static str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct ConverseRequest<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    system: Vec<TextBlock<'a>>,
    messages: Vec<ConverseMessage<'a>>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
struct OutputMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ConverseOutput {
    message: Option<OutputMessage>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Usage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConverseResponse {
    output: ConverseOutput,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Usage,
}

/// Client for a Bedrock chat model via the Converse API.
pub struct BedrockChatClient {
    client: Client,
    endpoint: String,
    model: String,
    auth: BedrockAuth,
}

impl BedrockChatClient {
    /// Creates a client targeting `model` on the runtime service at `endpoint`.
    pub fn new(endpoint: &str, model: &str, auth: BedrockAuth) -> Self {
        info!("BedrockChatClient: model={}, endpoint={}", model, endpoint);
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            auth,
        }
    }

    fn converse_url(&self) -> String {
        format!("{}/model/{}/converse", self.endpoint, urlencoding::encode(&self.model))
    }
}

fn build_request(messages: &[Message]) -> ConverseRequest<'_> {
    let system = messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .map(|m| TextBlock { text: &m.content })
        .collect();

    let messages = messages
        .iter()
        .filter(|m| m.role == MessageRole::User)
        .map(|m| ConverseMessage {
            role: "user",
            content: vec![TextBlock { text: &m.content }],
        })
        .collect();

    ConverseRequest { system, messages }
}

#[async_trait]
impl ChatModel for BedrockChatClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message]) -> Result<Completion, AgentError> {
        let start = Instant::now();

        let url = self.converse_url();
        let body = serde_json::to_vec(&build_request(messages))?;

        let request = self
            .auth
            .authorize(
                self.client.post(&url).header(CONTENT_TYPE, "application/json"),
                &url,
                &body,
            )
            .await
            .map_err(AgentError::LlmError)?;

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| AgentError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response).await;
            return Err(AgentError::LlmError(format!(
                "Bedrock Converse error {}: {}",
                status, body
            )));
        }

        let resp: ConverseResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ParseError(e.to_string()))?;

        // Non-text blocks contribute nothing; an empty reply is still a reply.
        let content = resp
            .output
            .message
            .ok_or(AgentError::MissingMessage)?
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        debug!("Converse stop_reason={:?}", resp.stop_reason);

        Ok(Completion {
            content,
            metrics: CompletionMetrics {
                input_tokens: resp.usage.input_tokens.unwrap_or(0),
                output_tokens: resp.usage.output_tokens.unwrap_or(0),
                elapsed_ms: start.elapsed().as_millis() as u64,
            },
        })
    }
}
