//! Use case generation from a [`CompanyInsight`].
//!
//! Two strategies satisfy the same contract:
//! - **Static**: a fixed, industry-independent list. Always succeeds.
//! - **Generative**: a prompt built from the insight is sent to a
//!   [`GenerationClient`]. Any failure degrades to an empty list.
//!
//! Both preserve the order of what they return; downstream keyword
//! derivation reads the first use case.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use scout_clients::{GenerationClient, GenerationStatus};
use scout_shared::{CompanyInsight, Stage, StageWarning, UseCase, UseCaseStrategy};

use crate::deadline::bounded;
use crate::outcome::StageOutcome;

/// The fixed suggestion list of the static strategy.
pub fn static_use_cases() -> Vec<UseCase> {
    vec![
        UseCase::new(
            "Customer Service Automation",
            "Automate customer service with chatbots.",
        ),
        UseCase::new(
            "Sales Forecasting",
            "Utilize predictive analytics for sales forecasting.",
        ),
        UseCase::new(
            "Personalized Marketing",
            "Implement recommendation systems for personalized marketing.",
        ),
    ]
}

/// Options for the generative strategy.
#[derive(Debug, Clone)]
pub struct GenerativeOptions {
    /// Output budget passed to the generation service.
    pub max_tokens: u32,
    /// Generated lists are truncated to this many entries.
    pub max_use_cases: usize,
    pub call_timeout: Duration,
}

/// Produces the ordered use case list for a company.
pub enum UseCaseGenerator {
    Static,
    Generative {
        client: Arc<dyn GenerationClient>,
        options: GenerativeOptions,
    },
}

impl UseCaseGenerator {
    pub fn generative(client: Arc<dyn GenerationClient>, options: GenerativeOptions) -> Self {
        Self::Generative { client, options }
    }

    pub fn strategy(&self) -> UseCaseStrategy {
        match self {
            Self::Static => UseCaseStrategy::Static,
            Self::Generative { .. } => UseCaseStrategy::Generative,
        }
    }

    #[instrument(skip_all, fields(company = %insight.company_name, strategy = ?self.strategy()))]
    pub async fn generate(&self, insight: &CompanyInsight) -> StageOutcome<Vec<UseCase>> {
        match self {
            Self::Static => StageOutcome::clean(static_use_cases()),
            Self::Generative { client, options } => {
                generate_with(client.as_ref(), options, insight).await
            }
        }
    }
}

async fn generate_with(
    client: &dyn GenerationClient,
    options: &GenerativeOptions,
    insight: &CompanyInsight,
) -> StageOutcome<Vec<UseCase>> {
    let prompt = build_prompt(insight, options.max_use_cases);

    let response = match bounded(
        "generation",
        options.call_timeout,
        client.generate(&prompt, options.max_tokens),
    )
    .await
    {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "use case generation failed");
            return StageOutcome::degraded(
                Vec::new(),
                StageWarning::new(Stage::UseCases, format!("use case generation failed: {e}")),
            );
        }
    };

    match (response.status, response.use_cases) {
        (GenerationStatus::Success, Some(mut use_cases)) => {
            use_cases.truncate(options.max_use_cases);
            info!(count = use_cases.len(), "use cases generated");
            StageOutcome::clean(use_cases)
        }
        (GenerationStatus::Success, None) => {
            debug!("generation response carried no use cases");
            StageOutcome::degraded(
                Vec::new(),
                StageWarning::new(
                    Stage::UseCases,
                    "generation response carried no recognizable use cases",
                ),
            )
        }
        (GenerationStatus::Failure { reason }, _) => {
            debug!(%reason, "generation service reported failure");
            StageOutcome::degraded(
                Vec::new(),
                StageWarning::new(
                    Stage::UseCases,
                    format!("generation service reported failure: {reason}"),
                ),
            )
        }
    }
}

/// Build the generation prompt for `insight`.
pub fn build_prompt(insight: &CompanyInsight, max_use_cases: usize) -> String {
    let mut prompt = format!(
        "Suggest up to {max_use_cases} practical AI/ML use cases for the company \"{}\" \
         in the {} industry.\n",
        insight.company_name, insight.industry_segment
    );

    if !insight.overview_items.is_empty() {
        prompt.push_str("\nWhat public sources say about the company:\n");
        for item in &insight.overview_items {
            let _ = writeln!(prompt, "- {}", item.context_text);
        }
    }

    if !insight.related_questions.is_empty() {
        prompt.push_str("\nQuestions people ask about the company:\n");
        for q in &insight.related_questions {
            let _ = writeln!(prompt, "- {q}");
        }
    }

    prompt.push_str(
        "\nRespond with a JSON array of objects with \"title\" (a few words) and \
         \"description\" (one sentence) fields, most valuable first.",
    );
    prompt
}
