//! Company research: one web search turned into a [`CompanyInsight`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use scout_clients::{SearchClient, SearchResponse};
use scout_shared::{CompanyInsight, OverviewItem, Stage, StageWarning};

use crate::classifier;
use crate::deadline::bounded;
use crate::outcome::StageOutcome;

/// Appended to the company name to form the research query.
pub const RESEARCH_QUERY_SUFFIX: &str = "overview industry analysis business model";

/// Context text used when a search hit has no snippet.
pub const MISSING_SNIPPET: &str = "No description";

/// Default cap on overview items and related questions.
pub const DEFAULT_OVERVIEW_LIMIT: usize = 3;

/// Builds a [`CompanyInsight`] from a single search query.
pub struct CompanyResearcher {
    search: Arc<dyn SearchClient>,
    overview_limit: usize,
    call_timeout: Duration,
}

impl CompanyResearcher {
    pub fn new(search: Arc<dyn SearchClient>, overview_limit: usize, call_timeout: Duration) -> Self {
        Self {
            search,
            overview_limit,
            call_timeout,
        }
    }

    /// Research `company_name`.
    ///
    /// Never fails: a failed or timed-out search, or one without organic
    /// results, yields an insight with no overview items and a reported
    /// warning. The industry segment always
    /// comes from the classifier.
    #[instrument(skip(self))]
    pub async fn research(&self, company_name: &str) -> StageOutcome<CompanyInsight> {
        let query = format!("{company_name} {RESEARCH_QUERY_SUFFIX}");

        match bounded("search", self.call_timeout, self.search.search(&query)).await {
            Ok(response) => {
                let insight = build_insight(company_name, &response, self.overview_limit);
                info!(
                    segment = %insight.industry_segment,
                    overview_items = insight.overview_items.len(),
                    "research complete"
                );
                if response.organic_results.is_empty() {
                    debug!("search returned no organic results");
                    return StageOutcome::degraded(
                        insight,
                        StageWarning::new(Stage::Research, "search returned no organic results"),
                    );
                }
                StageOutcome::clean(insight)
            }
            Err(e) => {
                debug!(error = %e, "company search failed, continuing without overview");
                StageOutcome::degraded(
                    build_insight(company_name, &SearchResponse::default(), self.overview_limit),
                    StageWarning::new(Stage::Research, format!("company search failed: {e}")),
                )
            }
        }
    }
}

/// Map a search response to an insight. Missing fields fall back to placeholders.
pub fn build_insight(company_name: &str, response: &SearchResponse, limit: usize) -> CompanyInsight {
    let overview_items = response
        .organic_results
        .iter()
        .take(limit)
        .map(|hit| OverviewItem {
            context_text: hit
                .snippet
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(MISSING_SNIPPET)
                .to_string(),
            source_link: hit.link.clone().unwrap_or_default(),
        })
        .collect();

    let related_questions = response
        .related_questions
        .iter()
        .filter_map(|q| q.question.as_deref().map(str::trim))
        .filter(|q| !q.is_empty())
        .take(limit)
        .map(String::from)
        .collect();

    CompanyInsight {
        company_name: company_name.to_string(),
        industry_segment: classifier::classify(company_name),
        overview_items,
        related_questions,
    }
}
