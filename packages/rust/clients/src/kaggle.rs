//! Kaggle dataset catalog.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use scout_shared::{KaggleCredentials, Result, ScoutError};

use crate::{CatalogClient, CatalogEntry, build_client, check_base_url, check_status, trim_base};

const SERVICE: &str = "kaggle";

/// One dataset from `/api/v1/datasets/list`.
#[derive(Debug, Default, Deserialize)]
struct KaggleDataset {
    #[serde(default, rename = "ref")]
    dataset_ref: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Kaggle-backed [`CatalogClient`], authenticated with HTTP basic auth.
#[derive(Debug, Clone)]
pub struct KaggleCatalog {
    client: Client,
    base_url: String,
    credentials: KaggleCredentials,
}

impl KaggleCatalog {
    pub fn new(
        base_url: impl Into<String>,
        credentials: KaggleCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(SERVICE, timeout)?,
            base_url: check_base_url(SERVICE, base_url.into())?,
            credentials,
        })
    }

    fn dataset_url(&self, dataset: &KaggleDataset) -> String {
        match dataset.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => match dataset.dataset_ref.as_deref() {
                Some(dataset_ref) if !dataset_ref.is_empty() => {
                    format!("{}/datasets/{dataset_ref}", trim_base(&self.base_url))
                }
                _ => String::new(),
            },
        }
    }
}

#[async_trait]
impl CatalogClient for KaggleCatalog {
    #[instrument(skip(self), fields(service = SERVICE))]
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}/api/v1/datasets/list", trim_base(&self.base_url));

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.key.expose()),
            )
            .query(&[("search", keyword), ("page", "1")])
            .send()
            .await
            .map_err(|e| ScoutError::network(SERVICE, e.to_string()))?;

        let response = check_status(SERVICE, response).await?;

        let datasets: Vec<KaggleDataset> = response
            .json()
            .await
            .map_err(|e| ScoutError::malformed(SERVICE, e.to_string()))?;

        debug!(found = datasets.len(), "catalog search complete");

        Ok(datasets
            .iter()
            .take(max_results)
            .map(|d| CatalogEntry {
                title: d.title.clone().unwrap_or_default(),
                description: d.subtitle.clone().unwrap_or_default(),
                url: self.dataset_url(d),
            })
            .collect())
    }
}
