//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const MISSING_PROMPT_MESSAGE: &str =
    "No prompt found in input. Please provide a 'prompt' key in the input.";
pub const PROCESSING_FAILED_MESSAGE: &str = "Agent processing failed";

/// Errors surfaced to HTTP callers. A processing failure keeps its cause for
/// logs and `Debug`, but the response body only ever carries the generic message.
#[derive(Debug)]
pub enum AppError {
    MissingPrompt,
    Processing(String),
    NotFound,
}

impl From<mojobot_core::AgentError> for AppError {
    fn from(e: mojobot_core::AgentError) -> Self {
        AppError::Processing(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::MissingPrompt => (StatusCode::BAD_REQUEST, MISSING_PROMPT_MESSAGE),
            AppError::Processing(_) => (StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED_MESSAGE),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use mojobot_core::AgentError;
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn test_processing_error_keeps_cause() {
        let err = AppError::from(AgentError::LlmError("Bedrock Converse error 403: denied".into()));
        match &err {
            AppError::Processing(detail) => assert!(detail.contains("403: denied"), "{detail}"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(format!("{err:?}").contains("denied"));
    }

    #[tokio::test]
    async fn test_processing_error_body_is_generic() {
        let err = AppError::from(AgentError::RetrievalError("secret-kb-arn unreachable".into()));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": PROCESSING_FAILED_MESSAGE}));
        assert!(!String::from_utf8_lossy(&bytes).contains("secret-kb-arn"));
    }
}
