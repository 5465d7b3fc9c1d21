//! AgentCore-compatible HTTP surface for mojobot.
//!
//! Routes:
//! - `GET /ping` — health check
//! - `POST /invocations` — answer a prompt

pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use mojobot_config::AppConfig;
use mojobot_engine::Agent;
use mojobot_llm::{BedrockAuth, BedrockChatClient, BedrockKnowledgeBase};
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ServerState {
    pub config: AppConfig,
    pub agent: Agent,
}

impl ServerState {
    pub fn new(config: AppConfig, agent: Agent) -> Self {
        Self { config, agent }
    }

    /// Wires the Bedrock clients described by `config` into an agent.
    ///
    /// Credentials come from the configured API key, else the AWS default
    /// credential chain for `config.region`.
    pub async fn from_config(config: AppConfig) -> Self {
        let auth = BedrockAuth::resolve(config.bearer_token.clone(), &config.region).await;
        let chat = BedrockChatClient::new(&config.runtime_endpoint, &config.model_id, auth.clone());
        let knowledge_base = BedrockKnowledgeBase::new(&config.agent_runtime_endpoint, auth);
        let agent = Agent::new(
            Arc::new(chat),
            Arc::new(knowledge_base),
            config.knowledge_base_id.clone(),
        );
        Self::new(config, agent)
    }
}

pub fn build_app(state: Arc<ServerState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/invocations", post(handlers::invocations::invoke))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/ping", get(handlers::ping))
        .fallback(handlers::not_found)
        .with_state(state)
}
