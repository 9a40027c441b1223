use serde::{Deserialize, Serialize};

use crate::{
    api::{
        client::{encode_body, required, ApiClient},
        error::ApiError,
        response::Validate,
    },
    domain::request::OutboundRequest,
};

pub const DEFAULT_TOP_K: u8 = 3;
pub const MAX_TOP_K: u8 = 5;
pub const DEFAULT_SOURCE: &str = "manual";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: u8,
}

#[derive(Debug, Serialize)]
struct IngestRequest<'a> {
    content: &'a str,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<String>,
    pub count: usize,
}

impl Validate for SearchResults {
    fn validate(&self) -> Result<(), String> {
        if self.count != self.results.len() {
            return Err(format!(
                "count says {} results but {} were returned",
                self.count,
                self.results.len()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeBaseStatus {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestReceipt {
    pub message: String,
    pub id: String,
}

/// Retrieval over the backend knowledge base.
pub struct RagApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RagApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn search(&self, query: &str, top_k: u8) -> Result<SearchResults, ApiError> {
        let query = required("query", query)?;
        if !(1..=MAX_TOP_K).contains(&top_k) {
            return Err(ApiError::invalid_input(format!(
                "top_k must be between 1 and {MAX_TOP_K}, got {top_k}"
            )));
        }
        let request = OutboundRequest::post_json(["rag", "search"], &SearchRequest { query, top_k })
            .map_err(encode_body)?;

        let results: SearchResults = self.client.fetch_valid(request).await?;
        if results.results.len() > usize::from(top_k) {
            return Err(ApiError::malformed(format!(
                "asked for at most {top_k} results, got {}",
                results.results.len()
            )));
        }
        Ok(results)
    }

    /// Seeds the default knowledge base; idempotent on the backend side.
    pub async fn initialize(&self) -> Result<KnowledgeBaseStatus, ApiError> {
        self.client
            .fetch(OutboundRequest::get(["rag", "initialize"]))
            .await
    }

    pub async fn ingest(
        &self,
        content: &str,
        source: Option<&str>,
        id: Option<&str>,
    ) -> Result<IngestReceipt, ApiError> {
        let content = required("content", content)?;
        let source = source
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .unwrap_or(DEFAULT_SOURCE);
        let id = id.map(str::trim).filter(|id| !id.is_empty());
        let request = OutboundRequest::post_json(
            ["rag", "ingest"],
            &IngestRequest {
                content,
                source,
                id,
            },
        )
        .map_err(encode_body)?;

        self.client.fetch(request).await
    }
}
