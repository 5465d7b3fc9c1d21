//! Agent invocation handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, warn};

use crate::dto::{InvocationRequest, InvocationResponse};
use crate::error::AppError;
use crate::ServerState;

/// POST /invocations - Answers a prompt in character.
pub async fn invoke(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<InvocationResponse>, AppError> {
    let request = InvocationRequest::parse(&body).unwrap_or_default();
    let Some(prompt) = request.prompt() else {
        warn!("Rejecting invocation without a prompt ({} byte body)", body.len());
        return Err(AppError::MissingPrompt);
    };

    debug!(
        "Invocation: {}... (retrieval: {})",
        prompt.chars().take(50).collect::<String>(),
        state.config.retrieval_enabled()
    );

    let completion = state.agent.invoke(prompt).await.map_err(|e| {
        error!("Error processing request: {}", e);
        e
    })?;

    Ok(Json(InvocationResponse::new(
        completion.content,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    )))
}
