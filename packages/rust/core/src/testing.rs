//! In-memory collaborators for stage and pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use scout_clients::{
    CatalogClient, CatalogEntry, GenerationClient, GenerationResponse, OrganicResult,
    RelatedQuestion, SearchClient, SearchResponse,
};
use scout_shared::{Result, ScoutError, UseCase};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

pub(crate) struct FakeSearch {
    response: Option<SearchResponse>,
    delay: Option<Duration>,
    pub(crate) queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub(crate) fn answering(response: SearchResponse) -> Self {
        Self {
            response: Some(response),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a network error.
    pub(crate) fn down() -> Self {
        Self {
            response: None,
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn slow(delay: Duration) -> Self {
        Self {
            response: Some(SearchResponse::default()),
            delay: Some(delay),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchClient for FakeSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response
            .clone()
            .ok_or_else(|| ScoutError::network("fake-search", "connection refused"))
    }
}

pub(crate) fn organic(snippet: Option<&str>, link: Option<&str>) -> OrganicResult {
    OrganicResult {
        title: None,
        snippet: snippet.map(String::from),
        link: link.map(String::from),
    }
}

pub(crate) fn question(text: &str) -> RelatedQuestion {
    RelatedQuestion {
        question: Some(text.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Returns `per_keyword` (or an override) synthetic entries for each keyword.
pub(crate) struct FakeCatalog {
    per_keyword: usize,
    overrides: HashMap<String, usize>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    pub(crate) calls: Mutex<Vec<(String, usize)>>,
}

impl FakeCatalog {
    pub(crate) fn with_results(per_keyword: usize) -> Self {
        Self {
            per_keyword,
            overrides: HashMap::new(),
            failing: HashSet::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn results_for(mut self, keyword: &str, count: usize) -> Self {
        self.overrides.insert(keyword.to_string(), count);
        self
    }

    pub(crate) fn failing_on(mut self, keyword: &str) -> Self {
        self.failing.insert(keyword.to_string());
        self
    }

    pub(crate) fn delayed(mut self, keyword: &str, delay: Duration) -> Self {
        self.delays.insert(keyword.to_string(), delay);
        self
    }

    pub(crate) fn keywords_queried(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(kw, _)| kw.clone())
            .collect()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<CatalogEntry>> {
        self.calls
            .lock()
            .unwrap()
            .push((keyword.to_string(), max_results));

        if let Some(delay) = self.delays.get(keyword) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(keyword) {
            return Err(ScoutError::network("fake-catalog", format!("{keyword}: HTTP 503")));
        }

        let count = self
            .overrides
            .get(keyword)
            .copied()
            .unwrap_or(self.per_keyword);

        Ok((0..count)
            .map(|i| CatalogEntry {
                title: format!("{keyword} dataset {i}"),
                description: format!("about {keyword}"),
                url: format!("https://catalog.test/{}/{i}", keyword.replace(' ', "-")),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

pub(crate) struct FakeGeneration {
    response: Option<GenerationResponse>,
    pub(crate) prompts: Mutex<Vec<(String, u32)>>,
}

impl FakeGeneration {
    pub(crate) fn suggesting(use_cases: Vec<UseCase>) -> Self {
        Self::responding(GenerationResponse::success(use_cases))
    }

    pub(crate) fn responding(response: GenerationResponse) -> Self {
        Self {
            response: Some(response),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a transport error.
    pub(crate) fn unreachable() -> Self {
        Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerationClient for FakeGeneration {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<GenerationResponse> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        self.response
            .clone()
            .ok_or_else(|| ScoutError::network("fake-generation", "connection reset"))
    }
}
