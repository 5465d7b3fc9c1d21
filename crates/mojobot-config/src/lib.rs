//! Process-level configuration, read once at startup from the environment.

use std::fmt;
use std::num::ParseIntError;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "amazon.nova-lite-v1:0";

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable configuration shared by the server and the agent.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Provider region.
    pub region: String,
    /// Chat model identifier passed to the Converse API.
    pub model_id: String,
    /// Knowledge base to query. `None` disables retrieval.
    pub knowledge_base_id: Option<String>,
    /// Bedrock API key. When present it is sent as a bearer token instead of
    /// signing requests with the default AWS credential chain.
    pub bearer_token: Option<String>,
    /// Base URL of the Bedrock runtime service.
    pub runtime_endpoint: String,
    /// Base URL of the Bedrock agent runtime service.
    pub agent_runtime_endpoint: String,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let runtime_endpoint = get("BEDROCK_RUNTIME_ENDPOINT")
            .unwrap_or_else(|| runtime_endpoint_for(&region));
        let agent_runtime_endpoint = get("BEDROCK_AGENT_RUNTIME_ENDPOINT")
            .unwrap_or_else(|| agent_runtime_endpoint_for(&region));

        Ok(Self {
            port,
            model_id: get("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            knowledge_base_id: get("KNOWLEDGE_BASE_ID"),
            bearer_token: get("AWS_BEARER_TOKEN_BEDROCK"),
            runtime_endpoint: runtime_endpoint.trim_end_matches('/').to_string(),
            agent_runtime_endpoint: agent_runtime_endpoint.trim_end_matches('/').to_string(),
            region,
        })
    }

    /// Returns true when a knowledge base is configured.
    pub fn retrieval_enabled(&self) -> bool {
        self.knowledge_base_id.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            knowledge_base_id: None,
            bearer_token: None,
            runtime_endpoint: runtime_endpoint_for(DEFAULT_REGION),
            agent_runtime_endpoint: agent_runtime_endpoint_for(DEFAULT_REGION),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("region", &self.region)
            .field("model_id", &self.model_id)
            .field("knowledge_base_id", &self.knowledge_base_id)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("runtime_endpoint", &self.runtime_endpoint)
            .field("agent_runtime_endpoint", &self.agent_runtime_endpoint)
            .finish()
    }
}

pub fn runtime_endpoint_for(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

pub fn agent_runtime_endpoint_for(region: &str) -> String {
    format!("https://bedrock-agent-runtime.{region}.amazonaws.com")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.model_id, "amazon.nova-lite-v1:0");
        assert_eq!(config.runtime_endpoint, "https://bedrock-runtime.us-east-1.amazonaws.com");
        assert!(!config.retrieval_enabled());
    }

    #[test]
    fn test_region_drives_endpoints() {
        let config = config_from(&[("AWS_REGION", "eu-west-1")]).unwrap();
        assert_eq!(config.runtime_endpoint, "https://bedrock-runtime.eu-west-1.amazonaws.com");
        assert_eq!(
            config.agent_runtime_endpoint,
            "https://bedrock-agent-runtime.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn test_endpoint_override_strips_trailing_slash() {
        let config = config_from(&[("BEDROCK_RUNTIME_ENDPOINT", "http://127.0.0.1:9000/")]).unwrap();
        assert_eq!(config.runtime_endpoint, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_blank_knowledge_base_disables_retrieval() {
        let config = config_from(&[("KNOWLEDGE_BASE_ID", "   ")]).unwrap();
        assert_eq!(config.knowledge_base_id, None);

        let config = config_from(&[("KNOWLEDGE_BASE_ID", "KB123")]).unwrap();
        assert_eq!(config.knowledge_base_id.as_deref(), Some("KB123"));
        assert!(config.retrieval_enabled());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { ref value, .. } if value == "eighty"));

        let config = config_from(&[("PORT", "9090")]).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_debug_redacts_bearer_token() {
        let config = config_from(&[("AWS_BEARER_TOKEN_BEDROCK", "secret-key")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
