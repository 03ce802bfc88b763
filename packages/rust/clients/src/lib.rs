//! External collaborators of the research pipeline.
//!
//! Each service the pipeline talks to is a single narrow trait:
//! [`SearchClient`] (web search), [`CatalogClient`] (dataset catalog) and
//! [`GenerationClient`] (LLM suggestions). Real HTTP implementations live in
//! the submodules; tests substitute fakes behind the same traits.
//!
//! Response types are deliberately lenient: every field defaults, so a
//! response missing expected structure decodes to empty values instead of
//! failing.

mod kaggle;
mod openrouter;
mod parser;
mod serpapi;
mod web_catalog;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use scout_shared::{Result, ScoutError, UseCase};

pub use kaggle::KaggleCatalog;
pub use openrouter::OpenRouterGenerator;
pub use parser::parse_use_cases;
pub use serpapi::SerpApiClient;
pub use web_catalog::WebDatasetCatalog;

/// User-Agent string for every outbound request.
const USER_AGENT: &str = concat!("UseCaseScout/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// One organic web search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// One "people also ask" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelatedQuestion {
    #[serde(default)]
    pub question: Option<String>,
}

/// Structured web search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    #[serde(default)]
    pub related_questions: Vec<RelatedQuestion>,
}

/// Executes a web search query.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse>;
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A dataset as described by a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Keyword search against a dataset catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Return at most `max_results` entries, in catalog ranking order.
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<CatalogEntry>>;
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Whether a generation call succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Success,
    Failure { reason: String },
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub status: GenerationStatus,
    /// `None` when the service answered but nothing usable could be parsed.
    pub use_cases: Option<Vec<UseCase>>,
}

impl GenerationResponse {
    pub fn success(use_cases: Vec<UseCase>) -> Self {
        Self {
            status: GenerationStatus::Success,
            use_cases: Some(use_cases),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: GenerationStatus::Failure {
                reason: reason.into(),
            },
            use_cases: None,
        }
    }
}

/// Turns a prompt into use case suggestions.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<GenerationResponse>;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with appropriate settings.
///
/// The transport timeout is a backstop; callers also bound each call.
fn build_client(service: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ScoutError::network(service, format!("failed to build HTTP client: {e}")))
}

/// Map a non-success HTTP status to a network error, keeping a short body excerpt.
async fn check_status(service: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    Err(ScoutError::network(service, format!("HTTP {status}: {excerpt}")))
}

/// Reject base URLs that are not absolute http(s) URLs.
fn check_base_url(service: &str, base_url: String) -> Result<String> {
    let parsed = url::Url::parse(&base_url)
        .map_err(|e| ScoutError::config(format!("invalid {service} base_url '{base_url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScoutError::config(format!(
            "invalid {service} base_url '{base_url}': expected http or https"
        )));
    }
    Ok(base_url)
}

/// Trim a base URL so paths can be appended with a single `/`.
fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_tolerates_missing_fields() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.organic_results.is_empty());
        assert!(resp.related_questions.is_empty());

        let resp: SearchResponse =
            serde_json::from_str(r#"{"organic_results":[{"position":1}],"related_questions":[{}]}"#)
                .unwrap();
        assert_eq!(resp.organic_results, vec![OrganicResult::default()]);
        assert_eq!(resp.related_questions[0].question, None);
    }

    #[test]
    fn failure_response_has_no_use_cases() {
        let resp = GenerationResponse::failure("quota exceeded");
        assert!(resp.use_cases.is_none());
        assert_eq!(
            resp.status,
            GenerationStatus::Failure {
                reason: "quota exceeded".into()
            }
        );
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(check_base_url("serpapi", "https://serpapi.com".into()).is_ok());
        assert!(check_base_url("serpapi", "serpapi.com".into()).is_err());
        let err = check_base_url("kaggle", "ftp://kaggle.test".into()).unwrap_err();
        assert!(err.to_string().contains("invalid kaggle base_url"));
    }

    #[test]
    fn trim_base_strips_trailing_slashes() {
        assert_eq!(trim_base("https://serpapi.com/"), "https://serpapi.com");
        assert_eq!(trim_base("http://127.0.0.1:8080"), "http://127.0.0.1:8080");
    }
}
