//! Keyword-based industry classification.
//!
//! The classifier looks only at the company name. Segments are tried in
//! [`IndustrySegment::DECLARATION_ORDER`]; the first one with a keyword that
//! occurs as a substring of the lowercased name wins. Names that match
//! nothing are [`IndustrySegment::Unclassified`].
//!
//! Search results gathered during research are not consulted, so a company
//! whose name carries no industry hint stays unclassified even when its
//! overview is unambiguous.

use scout_shared::IndustrySegment;

/// Classify a company by name. Pure and total.
pub fn classify(company_name: &str) -> IndustrySegment {
    explain(company_name)
        .map(|(segment, _)| segment)
        .unwrap_or(IndustrySegment::Unclassified)
}

/// The winning segment together with the keyword that selected it.
pub fn explain(company_name: &str) -> Option<(IndustrySegment, &'static str)> {
    let lowered = company_name.to_lowercase();

    IndustrySegment::DECLARATION_ORDER
        .into_iter()
        .find_map(|segment| {
            segment
                .keywords()
                .iter()
                .find(|kw| lowered.contains(*kw))
                .map(|kw| (segment, *kw))
        })
}
