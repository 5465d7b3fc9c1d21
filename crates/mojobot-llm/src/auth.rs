//! Request authentication for Bedrock endpoints.

use std::time::SystemTime;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use reqwest::RequestBuilder;
use tracing::{info, warn};

/// SigV4 service name shared by `bedrock-runtime` and `bedrock-agent-runtime`.
const SIGNING_NAME: &str = "bedrock";

/// How outgoing Bedrock requests are authenticated.
#[derive(Clone, Debug)]
pub enum BedrockAuth {
    /// Bedrock API key sent as a bearer token.
    ApiKey(String),
    /// SigV4 signature from an AWS credentials provider.
    SigV4 {
        credentials: SharedCredentialsProvider,
        region: String,
    },
    /// No credentials available; requests go out unsigned.
    Anonymous,
}

impl BedrockAuth {
    /// Picks the API key when given, otherwise the AWS default credential
    /// chain (environment, profile, container or instance role).
    pub async fn resolve(bearer_token: Option<String>, region: &str) -> Self {
        if let Some(token) = bearer_token {
            info!("Bedrock auth: API key");
            return Self::ApiKey(token);
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        match sdk_config.credentials_provider() {
            Some(credentials) => {
                info!("Bedrock auth: SigV4 via default credential chain ({})", region);
                Self::SigV4 { credentials, region: region.to_string() }
            }
            None => {
                warn!("Bedrock auth: no AWS credentials provider found, requests will be unsigned");
                Self::Anonymous
            }
        }
    }

    pub fn sigv4(credentials: impl ProvideCredentials + 'static, region: &str) -> Self {
        Self::SigV4 {
            credentials: SharedCredentialsProvider::new(credentials),
            region: region.to_string(),
        }
    }

    /// Adds authentication headers for a JSON `POST` of `body` to `url`.
    pub(crate) async fn authorize(
        &self,
        request: RequestBuilder,
        url: &str,
        body: &[u8],
    ) -> Result<RequestBuilder, String> {
        let (credentials, region) = match self {
            Self::ApiKey(token) => return Ok(request.bearer_auth(token)),
            Self::Anonymous => return Ok(request),
            Self::SigV4 { credentials, region } => (credentials, region),
        };

        let credentials = credentials
            .provide_credentials()
            .await
            .map_err(|e| format!("failed to load AWS credentials: {e}"))?;
        let identity = credentials.into();

        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(region.as_str())
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| format!("invalid signing parameters: {e}"))?
            .into();

        let signable = SignableRequest::new(
            "POST",
            url,
            [("content-type", "application/json")].into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| format!("request cannot be signed: {e}"))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| format!("signing failed: {e}"))?
            .into_parts();

        Ok(instructions
            .headers()
            .fold(request, |request, (name, value)| request.header(name, value)))
    }
}
