use serde::{Deserialize, Serialize};

// === Request DTOs ===

/// Body of `POST /invocations`.
///
/// Both `{"prompt": ".."}` and `{"input": {"prompt": ".."}}` are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct InvocationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub input: Option<InvocationInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvocationInput {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl InvocationRequest {
    /// Parses a raw body. Anything that isn't a JSON object of the expected
    /// shape yields `None`.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// Returns the first non-empty prompt, preferring `input.prompt`.
    /// Whitespace is a prompt like any other.
    pub fn prompt(&self) -> Option<&str> {
        let nested = self.input.as_ref().and_then(|i| i.prompt.as_deref());
        [nested, self.prompt.as_deref()]
            .into_iter()
            .flatten()
            .find(|p| !p.is_empty())
    }
}

// === Response DTOs ===

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "healthy" }
    }
}

#[derive(Debug, Serialize)]
pub struct InvocationOutput {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct InvocationResponse {
    pub output: InvocationOutput,
}

impl InvocationResponse {
    pub fn new(message: String, timestamp: String) -> Self {
        Self { output: InvocationOutput { message, timestamp } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shapes() {
        let top = InvocationRequest::parse(br#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(top.prompt(), Some("hi"));

        let nested = InvocationRequest::parse(br#"{"input":{"prompt":"hello"}}"#).unwrap();
        assert_eq!(nested.prompt(), Some("hello"));

        let both = InvocationRequest::parse(br#"{"prompt":"outer","input":{"prompt":"inner"}}"#).unwrap();
        assert_eq!(both.prompt(), Some("inner"));
    }

    #[test]
    fn test_empty_nested_prompt_falls_back_to_top_level() {
        let req = InvocationRequest::parse(br#"{"prompt":"outer","input":{"prompt":""}}"#).unwrap();
        assert_eq!(req.prompt(), Some("outer"));
    }

    #[test]
    fn test_whitespace_prompt_is_kept() {
        let top = InvocationRequest::parse(br#"{"prompt":"   "}"#).unwrap();
        assert_eq!(top.prompt(), Some("   "));

        let nested = InvocationRequest::parse(br#"{"prompt":"outer","input":{"prompt":"\n"}}"#).unwrap();
        assert_eq!(nested.prompt(), Some("\n"));
    }

    #[test]
    fn test_missing_or_invalid_prompt() {
        assert_eq!(InvocationRequest::parse(b"{}").unwrap().prompt(), None);
        assert_eq!(InvocationRequest::parse(br#"{"prompt":""}"#).unwrap().prompt(), None);
        assert_eq!(InvocationRequest::parse(br#"{"input":{}}"#).unwrap().prompt(), None);
        assert!(InvocationRequest::parse(br#"{"prompt":42}"#).is_none());
        assert!(InvocationRequest::parse(b"not json").is_none());
        assert!(InvocationRequest::parse(b"").is_none());
    }

    #[test]
    fn test_response_shape() {
        let resp = InvocationResponse::new("Meow".into(), "2024-01-01T00:00:00.000Z".into());
        assert_eq!(
            serde_json::to_value(resp).unwrap(),
            serde_json::json!({"output": {"message": "Meow", "timestamp": "2024-01-01T00:00:00.000Z"}})
        );
    }
}
