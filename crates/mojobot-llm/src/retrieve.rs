//! Bedrock Knowledge Bases `Retrieve` client.

use async_trait::async_trait;
use mojobot_core::{AgentError, KnowledgeBase, RetrievedPassage};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{error_body, BedrockAuth};

#[derive(Serialize)]
struct RetrievalQuery<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration {
    number_of_results: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration {
    vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest<'a> {
    retrieval_query: RetrievalQuery<'a>,
    retrieval_configuration: RetrievalConfiguration,
}

#[derive(Deserialize)]
struct ResultContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct RetrievalResult {
    content: Option<ResultContent>,
    location: Option<Value>,
    score: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveResponse {
    #[serde(default)]
    retrieval_results: Vec<RetrievalResult>,
}

/// Client for a Bedrock knowledge base via the agent runtime `Retrieve` API.
pub struct BedrockKnowledgeBase {
    client: Client,
    endpoint: String,
    auth: BedrockAuth,
}

impl BedrockKnowledgeBase {
    pub fn new(endpoint: &str, auth: BedrockAuth) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn retrieve_url(&self, knowledge_base_id: &str) -> String {
        format!(
            "{}/knowledgebases/{}/retrieve",
            self.endpoint,
            urlencoding::encode(knowledge_base_id)
        )
    }
}

/// Picks the document URI out of a location object such as
/// `{"type":"S3","s3Location":{"uri":"s3://..."}}`.
fn location_uri(location: &Value) -> Option<String> {
    location
        .as_object()?
        .values()
        .filter_map(Value::as_object)
        .find_map(|inner| inner.get("uri").or_else(|| inner.get("url")))
        .and_then(Value::as_str)
        .map(String::from)
}

fn into_passage(result: RetrievalResult) -> RetrievedPassage {
    RetrievedPassage {
        text: result.content.and_then(|c| c.text).unwrap_or_default(),
        source: result.location.as_ref().and_then(location_uri),
        score: result.score,
    }
}

#[async_trait]
impl KnowledgeBase for BedrockKnowledgeBase {
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: u32,
    ) -> Result<Vec<RetrievedPassage>, AgentError> {
        let request = RetrieveRequest {
            retrieval_query: RetrievalQuery { text: query },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: top_k,
                },
            },
        };

        let url = self.retrieve_url(knowledge_base_id);
        let body = serde_json::to_vec(&request)?;

        let request = self
            .auth
            .authorize(
                self.client.post(&url).header(CONTENT_TYPE, "application/json"),
                &url,
                &body,
            )
            .await
            .map_err(AgentError::RetrievalError)?;

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| AgentError::RetrievalError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response).await;
            return Err(AgentError::RetrievalError(format!(
                "Knowledge base {} returned {}: {}",
                knowledge_base_id, status, body
            )));
        }

        let resp: RetrieveResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ParseError(e.to_string()))?;

        let passages: Vec<RetrievedPassage> =
            resp.retrieval_results.into_iter().map(into_passage).collect();

        for p in &passages {
            debug!(source = ?p.source, score = ?p.score, chars = p.text.len(), "Retrieved passage");
        }

        Ok(passages)
    }
}
