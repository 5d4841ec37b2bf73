//! Web search tool for the research stage
//!
//! [`SearchTool`] wraps a [`SearchProvider`] and never fails: provider errors
//! come back as a JSON `{"error": ...}` object so the calling model can decide
//! whether to retry, ignore or report them.

use crate::error::GeneratorError;
use async_trait::async_trait;
use blog_generator_sdk::Tool;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const SEARCH_TOOL_NAME: &str = "web_search";
pub const API_KEY_VAR: &str = "TAVILY_API_KEY";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{0}")]
    Provider(String),
}

/// External web-search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return at most `max_results` result objects for `query`
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError>;
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

/// Tavily search API client
pub struct TavilySearch {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: TAVILY_BASE_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Client keyed by `TAVILY_API_KEY`
    pub fn from_env() -> crate::error::Result<Self> {
        std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| GeneratorError::Settings(format!("{} is not set", API_KEY_VAR)))
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        let response = self.http_client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut payload: Value = response.json().await?;
        match payload.get_mut("results").map(Value::take) {
            Some(Value::Array(results)) => Ok(results),
            _ => Err(SearchError::Provider(
                "response has no 'results' array".to_string(),
            )),
        }
    }
}

/// Search adapter exposed to the research stage as the `web_search` tool
pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl SearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Search and return pretty JSON: the results array, or an error object
    pub async fn search(&self, query: &str) -> String {
        match self.provider.search(query, self.max_results).await {
            Ok(results) => {
                tracing::debug!(query, results = results.len(), "Web search completed");
                serde_json::to_string_pretty(&results).unwrap_or_else(|e| error_envelope(&e.to_string()))
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Web search failed");
                error_envelope(&e.to_string())
            }
        }
    }
}

fn error_envelope(message: &str) -> String {
    let envelope = json!({ "error": format!("Search failed: {}", message) });
    serde_json::to_string_pretty(&envelope)
        .unwrap_or_else(|_| r#"{"error": "Search failed"}"#.to_string())
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web and return the most relevant results with titles, URLs and content summaries"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, arguments: Value) -> String {
        match arguments.get("query").and_then(Value::as_str) {
            Some(query) if !query.trim().is_empty() => self.search(query).await,
            _ => error_envelope("missing 'query' argument"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedResults {
        count: usize,
        seen: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl SearchProvider for FixedResults {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Value>, SearchError> {
            self.seen
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            Ok((0..self.count)
                .map(|i| json!({"title": format!("Result {}", i), "url": format!("https://example.com/{}", i)}))
                .collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl SearchProvider for Failing {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<Value>, SearchError> {
            Err(SearchError::Api {
                status: 429,
                body: "rate limited".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_search_returns_results_array() {
        let provider = Arc::new(FixedResults {
            count: 3,
            seen: Mutex::new(Vec::new()),
        });
        let tool = SearchTool::new(provider.clone());

        let output = tool.search("local seo").await;
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed.as_array().unwrap().len(), 3);
        assert_eq!(
            provider.seen.lock().unwrap().as_slice(),
            &[("local seo".to_string(), DEFAULT_MAX_RESULTS)]
        );
    }

    #[tokio::test]
    async fn test_search_failure_becomes_error_object() {
        let tool = SearchTool::new(Arc::new(Failing));

        let output = tool.search("local seo").await;
        let parsed: Value = serde_json::from_str(&output).unwrap();

        let message = parsed["error"].as_str().unwrap();
        assert!(message.starts_with("Search failed:"));
        assert!(message.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_tool_call_reads_query_argument() {
        let tool = SearchTool::new(Arc::new(FixedResults {
            count: 2,
            seen: Mutex::new(Vec::new()),
        }));

        let output = tool.call(json!({"query": "case vacanza"})).await;
        assert_eq!(
            serde_json::from_str::<Value>(&output).unwrap().as_array().unwrap().len(),
            2
        );

        let missing = tool.call(json!({})).await;
        assert!(serde_json::from_str::<Value>(&missing).unwrap()["error"].is_string());
    }

    #[test]
    fn test_tool_schema_requires_query() {
        let tool = SearchTool::new(Arc::new(Failing));
        assert_eq!(tool.name(), "web_search");
        assert_eq!(tool.parameters()["required"], json!(["query"]));
    }
}
