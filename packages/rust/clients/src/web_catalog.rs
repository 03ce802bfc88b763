//! Dataset discovery through plain web search.
//!
//! Searches for `"<keyword> dataset"` and treats each organic hit as a
//! catalog entry. Useful when no dedicated catalog credentials exist.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use scout_shared::Result;

use crate::{CatalogClient, CatalogEntry, SearchClient};

/// [`CatalogClient`] backed by any [`SearchClient`].
#[derive(Clone)]
pub struct WebDatasetCatalog {
    search: Arc<dyn SearchClient>,
}

impl WebDatasetCatalog {
    pub fn new(search: Arc<dyn SearchClient>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl CatalogClient for WebDatasetCatalog {
    #[instrument(skip(self))]
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<CatalogEntry>> {
        let response = self.search.search(&format!("{keyword} dataset")).await?;

        Ok(response
            .organic_results
            .into_iter()
            .filter_map(|hit| {
                // A hit without a link cannot be followed; skip it.
                let url = hit.link.filter(|l| !l.is_empty())?;
                Some(CatalogEntry {
                    title: hit.title.unwrap_or_else(|| url.clone()),
                    description: hit.snippet.unwrap_or_default(),
                    url,
                })
            })
            .take(max_results)
            .collect())
    }
}
