//! Core domain types for a research run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// IndustrySegment
// ---------------------------------------------------------------------------

/// One industry vertical a company can be classified into.
///
/// Variants are listed in declaration order, which is also the classifier's
/// tie-break order: when a name matches keywords of several segments, the
/// earliest one in [`IndustrySegment::DECLARATION_ORDER`] wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustrySegment {
    Tech,
    Finance,
    Healthcare,
    Retail,
    Manufacturing,
    Energy,
    Logistics,
    Media,
    /// Sentinel for names that match no keyword.
    Unclassified,
}

impl IndustrySegment {
    /// Classifiable segments in declaration (tie-break) order.
    pub const DECLARATION_ORDER: [IndustrySegment; 8] = [
        Self::Tech,
        Self::Finance,
        Self::Healthcare,
        Self::Retail,
        Self::Manufacturing,
        Self::Energy,
        Self::Logistics,
        Self::Media,
    ];

    /// Lowercase keyword substrings that select this segment.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Tech => &[
                "technology",
                "software",
                "cloud",
                "digital",
                "tech",
                "cyber",
                "semiconductor",
            ],
            Self::Finance => &[
                "bank",
                "financ",
                "capital",
                "insurance",
                "invest",
                "credit",
            ],
            Self::Healthcare => &[
                "health",
                "medical",
                "pharma",
                "clinic",
                "hospital",
                "therapeutics",
                "bio",
            ],
            Self::Retail => &["retail", "store", "shop", "commerce", "grocery", "apparel"],
            Self::Manufacturing => &[
                "manufactur",
                "industrial",
                "factory",
                "steel",
                "machinery",
                "motors",
            ],
            Self::Energy => &["energy", "petroleum", "solar", "power", "oil", "gas"],
            Self::Logistics => &["logistic", "freight", "shipping", "transport", "delivery"],
            Self::Media => &["media", "entertainment", "studio", "publishing", "news"],
            Self::Unclassified => &[],
        }
    }

    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Finance => "finance",
            Self::Healthcare => "healthcare",
            Self::Retail => "retail",
            Self::Manufacturing => "manufacturing",
            Self::Energy => "energy",
            Self::Logistics => "logistics",
            Self::Media => "media",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for IndustrySegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Research output
// ---------------------------------------------------------------------------

/// One snippet + link pair summarizing the company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewItem {
    pub context_text: String,
    /// Empty when the search result carried no link.
    pub source_link: String,
}

/// Structured research record for one company, built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInsight {
    pub company_name: String,
    pub industry_segment: IndustrySegment,
    /// Top organic search results, in engine order.
    pub overview_items: Vec<OverviewItem>,
    /// "People also ask" questions from the same search.
    #[serde(default)]
    pub related_questions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Use cases and datasets
// ---------------------------------------------------------------------------

/// A candidate AI/ML application for the company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub title: String,
    pub description: String,
}

impl UseCase {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A dataset catalog entry matched to a search keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub title: String,
    pub description: String,
    pub link: String,
    /// The keyword whose catalog query surfaced this record.
    pub source_use_case: String,
}

// ---------------------------------------------------------------------------
// Warnings and results
// ---------------------------------------------------------------------------

/// The three sequential pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Research,
    UseCases,
    Datasets,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Research => "research",
            Self::UseCases => "use_cases",
            Self::Datasets => "datasets",
        })
    }
}

/// A non-fatal condition reported by a stage that degraded its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWarning {
    pub stage: Stage,
    pub message: String,
}

impl StageWarning {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Consolidated output of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub insight: CompanyInsight,
    pub use_cases: Vec<UseCase>,
    pub datasets: Vec<DatasetRecord>,
    /// Every degraded-stage condition, in the order it was reported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<StageWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_serializes_as_label() {
        let json = serde_json::to_string(&IndustrySegment::Unclassified).unwrap();
        assert_eq!(json, r#""unclassified""#);
        for segment in IndustrySegment::DECLARATION_ORDER {
            let json = serde_json::to_string(&segment).unwrap();
            assert_eq!(json, format!("\"{}\"", segment.as_str()));
        }
    }

    #[test]
    fn declaration_order_starts_with_tech_and_excludes_sentinel() {
        assert_eq!(IndustrySegment::DECLARATION_ORDER[0], IndustrySegment::Tech);
        assert!(!IndustrySegment::DECLARATION_ORDER.contains(&IndustrySegment::Unclassified));
    }

    #[test]
    fn every_classifiable_segment_has_lowercase_keywords() {
        for segment in IndustrySegment::DECLARATION_ORDER {
            let keywords = segment.keywords();
            assert!(!keywords.is_empty(), "{segment} has no keywords");
            for kw in keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }

    #[test]
    fn insight_without_related_questions_deserializes() {
        let json = r#"{"company_name":"Acme","industry_segment":"tech","overview_items":[]}"#;
        let insight: CompanyInsight = serde_json::from_str(json).unwrap();
        assert_eq!(insight.industry_segment, IndustrySegment::Tech);
        assert!(insight.related_questions.is_empty());
    }

    #[test]
    fn pipeline_result_omits_empty_warnings() {
        let result = PipelineResult {
            run_id: RunId::new(),
            generated_at: Utc::now(),
            insight: CompanyInsight {
                company_name: "Acme".into(),
                industry_segment: IndustrySegment::Unclassified,
                overview_items: vec![],
                related_questions: vec![],
            },
            use_cases: vec![],
            datasets: vec![],
            warnings: vec![],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("warnings"));
        assert!(json.contains(r#""use_cases":[]"#));
    }
}
