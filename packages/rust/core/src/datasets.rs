//! Dataset collection: keyword derivation plus per-keyword catalog queries.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info, instrument};

use scout_clients::{CatalogClient, CatalogEntry};
use scout_shared::{DatasetRecord, Result, Stage, StageWarning, UseCase};

use crate::deadline::bounded;
use crate::outcome::StageOutcome;

/// Default number of catalog results requested per keyword.
pub const DEFAULT_RESULTS_PER_KEYWORD: usize = 3;

/// Derive the ordered catalog keywords for a company.
///
/// In order: the company name, the first word of the first use case's title,
/// the first word of its description. Empty candidates are omitted and a
/// keyword already present is not repeated.
///
/// "First word" is a crude stand-in for keyphrase extraction; changing it
/// changes which datasets a run surfaces.
pub fn derive_keywords(company_name: &str, use_cases: &[UseCase]) -> Vec<String> {
    let first = use_cases.first();
    let candidates = [
        Some(company_name.trim()),
        first.and_then(|uc| uc.title.split_whitespace().next()),
        first.and_then(|uc| uc.description.split_whitespace().next()),
    ];

    let mut keywords: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates.into_iter().flatten() {
        if !candidate.is_empty() && !keywords.iter().any(|k| k == candidate) {
            keywords.push(candidate.to_string());
        }
    }
    keywords
}

/// Queries a dataset catalog once per derived keyword.
pub struct DatasetCollector {
    catalog: Arc<dyn CatalogClient>,
    max_results: usize,
    concurrent: bool,
    call_timeout: Duration,
}

impl DatasetCollector {
    pub fn new(catalog: Arc<dyn CatalogClient>, max_results: usize, call_timeout: Duration) -> Self {
        Self {
            catalog,
            max_results,
            concurrent: true,
            call_timeout,
        }
    }

    /// Issue keyword queries one after another instead of concurrently.
    pub fn sequential(mut self) -> Self {
        self.concurrent = false;
        self
    }

    /// Collect datasets for `company_name` and its use cases.
    ///
    /// Records come back in keyword order, then catalog order within a
    /// keyword. The same dataset may appear under several keywords. A
    /// failing keyword is reported and skipped.
    #[instrument(skip(self, use_cases), fields(use_cases = use_cases.len(), concurrent = self.concurrent))]
    pub async fn collect(
        &self,
        company_name: &str,
        use_cases: &[UseCase],
    ) -> StageOutcome<Vec<DatasetRecord>> {
        let keywords = derive_keywords(company_name, use_cases);
        debug!(?keywords, "derived catalog keywords");

        // Both paths yield results indexed like `keywords`.
        let results: Vec<Result<Vec<CatalogEntry>>> = if self.concurrent {
            join_all(keywords.iter().map(|kw| self.query(kw))).await
        } else {
            let mut results = Vec::with_capacity(keywords.len());
            for kw in &keywords {
                results.push(self.query(kw).await);
            }
            results
        };

        let mut outcome = StageOutcome::clean(Vec::new());
        for (keyword, result) in keywords.iter().zip(results) {
            match result {
                Ok(entries) => {
                    debug!(%keyword, found = entries.len(), "catalog query complete");
                    outcome
                        .output
                        .extend(entries.into_iter().map(|entry| DatasetRecord {
                            title: entry.title,
                            description: entry.description,
                            link: entry.url,
                            source_use_case: keyword.clone(),
                        }));
                }
                Err(e) => {
                    debug!(%keyword, error = %e, "catalog query failed, skipping keyword");
                    outcome.warnings.push(StageWarning::new(
                        Stage::Datasets,
                        format!("catalog query for '{keyword}' failed: {e}"),
                    ));
                }
            }
        }

        info!(
            keywords = keywords.len(),
            datasets = outcome.output.len(),
            failed = outcome.warnings.len(),
            "dataset collection complete"
        );
        outcome
    }

    async fn query(&self, keyword: &str) -> Result<Vec<CatalogEntry>> {
        let mut entries = bounded(
            "catalog",
            self.call_timeout,
            self.catalog.search(keyword, self.max_results),
        )
        .await?;
        entries.truncate(self.max_results);
        Ok(entries)
    }
}
