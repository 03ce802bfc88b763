//! Google web search through SerpApi.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use scout_shared::{ApiKey, Result, ScoutError};

use crate::{SearchClient, SearchResponse, build_client, check_base_url, check_status, trim_base};

const SERVICE: &str = "serpapi";

/// SerpApi-backed [`SearchClient`] using the `google` engine.
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl SerpApiClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(SERVICE, timeout)?,
            base_url: check_base_url(SERVICE, base_url.into())?,
            api_key,
        })
    }
}

#[async_trait]
impl SearchClient for SerpApiClient {
    #[instrument(skip(self), fields(service = SERVICE))]
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        let url = format!("{}/search.json", trim_base(&self.base_url));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| ScoutError::network(SERVICE, e.to_string()))?;

        let response = check_status(SERVICE, response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ScoutError::malformed(SERVICE, e.to_string()))?;

        debug!(
            organic = body.organic_results.len(),
            related = body.related_questions.len(),
            "search complete"
        );

        Ok(body)
    }
}
