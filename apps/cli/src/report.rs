//! Plain-text rendering of a pipeline result.

use std::fmt::Write as _;

use scout_shared::{DatasetRecord, PipelineResult};

/// Render `result` as the human-readable report printed by `scout run`.
pub(crate) fn render(result: &PipelineResult) -> String {
    let mut out = String::new();
    let insight = &result.insight;

    let _ = writeln!(out);
    let _ = writeln!(out, "  Company:  {}", insight.company_name);
    let _ = writeln!(out, "  Industry: {}", insight.industry_segment);
    let _ = writeln!(out, "  Run:      {}", result.run_id);

    let _ = writeln!(out, "\n  Overview");
    if insight.overview_items.is_empty() {
        let _ = writeln!(out, "    (no overview found)");
    }
    for item in &insight.overview_items {
        let _ = writeln!(out, "    - {}", item.context_text);
        if !item.source_link.is_empty() {
            let _ = writeln!(out, "      {}", item.source_link);
        }
    }
    if !insight.related_questions.is_empty() {
        let _ = writeln!(out, "\n  People also ask");
        for q in &insight.related_questions {
            let _ = writeln!(out, "    - {q}");
        }
    }

    let _ = writeln!(out, "\n  Suggested use cases");
    if result.use_cases.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for (i, uc) in result.use_cases.iter().enumerate() {
        let _ = writeln!(out, "    {}. {}: {}", i + 1, uc.title, uc.description);
    }

    let _ = writeln!(out, "\n  Relevant datasets");
    if result.datasets.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for (keyword, records) in group_by_keyword(&result.datasets) {
        let _ = writeln!(out, "    Keyword: {keyword}");
        for r in records {
            let _ = writeln!(out, "      - {} <{}>", r.title, r.link);
        }
    }

    if !result.warnings.is_empty() {
        let _ = writeln!(out, "\n  Warnings");
        for w in &result.warnings {
            let _ = writeln!(out, "    [{}] {}", w.stage, w.message);
        }
    }
    let _ = writeln!(out);

    out
}

/// Consecutive runs of records sharing a keyword.
fn group_by_keyword(records: &[DatasetRecord]) -> Vec<(&str, Vec<&DatasetRecord>)> {
    let mut groups: Vec<(&str, Vec<&DatasetRecord>)> = Vec::new();
    for record in records {
        let keyword = record.source_use_case.as_str();
        match groups.last_mut() {
            Some((last, members)) if *last == keyword => members.push(record),
            _ => groups.push((keyword, vec![record])),
        }
    }
    groups
}
