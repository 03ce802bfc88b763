//! End-to-end research run: company name → insight → use cases → datasets.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use scout_clients::{CatalogClient, GenerationClient, SearchClient};
use scout_shared::{
    PipelineConfig, PipelineResult, Result, RunId, ScoutError, StageWarning, UseCaseStrategy,
};

use crate::datasets::DatasetCollector;
use crate::research::CompanyResearcher;
use crate::usecases::{GenerativeOptions, UseCaseGenerator};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called for every degraded-stage condition as it happens.
    fn warning(&self, warning: &StageWarning);
    /// Called when the pipeline completes.
    fn done(&self, result: &PipelineResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn warning(&self, _warning: &StageWarning) {}
    fn done(&self, _result: &PipelineResult) {}
}

/// Reject blank company names. Returns the trimmed name.
///
/// The trimmed name is what every stage sees: it is the search query
/// prefix, the first catalog keyword and the tag on its datasets.
pub fn validate_company_name(company_name: &str) -> Result<&str> {
    let trimmed = company_name.trim();
    if trimmed.is_empty() {
        return Err(ScoutError::invalid_input("company name must not be empty"));
    }
    Ok(trimmed)
}

/// Runs the three stages in sequence.
pub struct PipelineOrchestrator {
    researcher: CompanyResearcher,
    generator: UseCaseGenerator,
    collector: DatasetCollector,
}

impl PipelineOrchestrator {
    pub fn new(
        researcher: CompanyResearcher,
        generator: UseCaseGenerator,
        collector: DatasetCollector,
    ) -> Self {
        Self {
            researcher,
            generator,
            collector,
        }
    }

    /// Wire the stages from runtime config and ready-built clients.
    ///
    /// `generation` is required when the config selects the generative
    /// strategy and ignored otherwise.
    pub fn from_config(
        config: &PipelineConfig,
        search: Arc<dyn SearchClient>,
        catalog: Arc<dyn CatalogClient>,
        generation: Option<Arc<dyn GenerationClient>>,
    ) -> Result<Self> {
        let generator = match (config.strategy, generation) {
            (UseCaseStrategy::Static, _) => UseCaseGenerator::Static,
            (UseCaseStrategy::Generative, Some(client)) => UseCaseGenerator::generative(
                client,
                GenerativeOptions {
                    max_tokens: config.max_tokens,
                    max_use_cases: config.max_use_cases,
                    call_timeout: config.call_timeout,
                },
            ),
            (UseCaseStrategy::Generative, None) => {
                return Err(ScoutError::config(
                    "generative strategy selected but no generation client configured",
                ));
            }
        };

        let mut collector =
            DatasetCollector::new(catalog, config.dataset_results, config.call_timeout);
        if !config.concurrent_catalog {
            collector = collector.sequential();
        }

        Ok(Self::new(
            CompanyResearcher::new(search, config.overview_limit, config.call_timeout),
            generator,
            collector,
        ))
    }

    /// Run the full pipeline.
    ///
    /// 1. Research: search + classify
    /// 2. Use cases: from the insight
    /// 3. Datasets: catalog queries for derived keywords
    ///
    /// Fails only when `company_name` is blank, before any client call.
    /// Stage failures degrade that stage's output and are collected in
    /// [`PipelineResult::warnings`].
    #[instrument(skip_all, fields(company = %company_name))]
    pub async fn run(
        &self,
        company_name: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineResult> {
        let company_name = validate_company_name(company_name)?;
        let start = Instant::now();
        let run_id = RunId::new();
        let mut warnings: Vec<StageWarning> = Vec::new();

        info!(%run_id, "starting research pipeline");

        // --- Phase 1: Research ---
        progress.phase("Researching company");
        let research = self.researcher.research(company_name).await;
        report(&mut warnings, research.warnings, progress);
        let insight = research.output;

        // --- Phase 2: Use cases ---
        progress.phase("Generating use cases");
        let generated = self.generator.generate(&insight).await;
        report(&mut warnings, generated.warnings, progress);
        let use_cases = generated.output;

        // --- Phase 3: Datasets ---
        progress.phase("Collecting datasets");
        let collected = self.collector.collect(company_name, &use_cases).await;
        report(&mut warnings, collected.warnings, progress);
        let datasets = collected.output;

        let result = PipelineResult {
            run_id,
            generated_at: chrono::Utc::now(),
            insight,
            use_cases,
            datasets,
            warnings,
        };

        progress.done(&result);

        info!(
            run_id = %result.run_id,
            segment = %result.insight.industry_segment,
            use_cases = result.use_cases.len(),
            datasets = result.datasets.len(),
            warnings = result.warnings.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "research pipeline complete"
        );

        Ok(result)
    }
}

fn report(
    sink: &mut Vec<StageWarning>,
    warnings: Vec<StageWarning>,
    progress: &dyn ProgressReporter,
) {
    for warning in warnings {
        progress.warning(&warning);
        sink.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use scout_clients::{GenerationResponse, SearchResponse};
    use scout_shared::{IndustrySegment, Stage};

    use super::*;
    use crate::testing::{FakeCatalog, FakeGeneration, FakeSearch, organic};
    use crate::usecases::static_use_cases;

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
        warnings: Mutex<Vec<StageWarning>>,
        done: Mutex<usize>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }
        fn warning(&self, warning: &StageWarning) {
            self.warnings.lock().unwrap().push(warning.clone());
        }
        fn done(&self, _result: &PipelineResult) {
            *self.done.lock().unwrap() += 1;
        }
    }

    fn acme_search() -> FakeSearch {
        FakeSearch::answering(SearchResponse {
            organic_results: vec![organic(
                Some("Acme Cloud Software builds SaaS tools."),
                Some("https://acme.test"),
            )],
            related_questions: vec![],
        })
    }

    fn config(strategy: UseCaseStrategy) -> PipelineConfig {
        PipelineConfig {
            strategy,
            call_timeout: Duration::from_secs(5),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn acme_cloud_software_end_to_end() {
        let search = Arc::new(acme_search());
        let catalog = Arc::new(FakeCatalog::with_results(2));
        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Static),
            search.clone(),
            catalog.clone(),
            None,
        )
        .unwrap();

        let result = pipeline
            .run("Acme Cloud Software", &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.insight.industry_segment, IndustrySegment::Tech);
        assert_eq!(result.insight.overview_items.len(), 1);
        assert_eq!(result.use_cases, static_use_cases());
        assert_eq!(search.query_count(), 1);

        let first = &result.use_cases[0];
        let title_word = first.title.split_whitespace().next().unwrap();
        let desc_word = first.description.split_whitespace().next().unwrap();
        assert_eq!(
            catalog.keywords_queried(),
            vec!["Acme Cloud Software", title_word, desc_word]
        );
        assert_eq!(result.datasets.len(), 6);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_any_call() {
        let search = Arc::new(acme_search());
        let catalog = Arc::new(FakeCatalog::with_results(2));
        let generation = Arc::new(FakeGeneration::suggesting(vec![]));
        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Generative),
            search.clone(),
            catalog.clone(),
            Some(generation.clone()),
        )
        .unwrap();
        let progress = RecordingProgress::default();

        for name in ["", "   "] {
            let err = pipeline.run(name, &progress).await.unwrap_err();
            assert!(matches!(err, ScoutError::InvalidInput { .. }));
        }

        assert_eq!(search.query_count(), 0);
        assert!(catalog.calls.lock().unwrap().is_empty());
        assert!(generation.prompts.lock().unwrap().is_empty());
        assert!(progress.phases.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_still_collects_datasets() {
        let catalog = Arc::new(FakeCatalog::with_results(3));
        let generation = Arc::new(FakeGeneration::responding(GenerationResponse::failure(
            "HTTP 500",
        )));
        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Generative),
            Arc::new(acme_search()),
            catalog.clone(),
            Some(generation),
        )
        .unwrap();
        let progress = RecordingProgress::default();

        let result = pipeline.run("Acme Cloud Software", &progress).await.unwrap();

        assert!(result.use_cases.is_empty());
        assert_eq!(catalog.keywords_queried(), vec!["Acme Cloud Software"]);
        assert_eq!(result.datasets.len(), 3);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].stage, Stage::UseCases);
        assert_eq!(progress.warnings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn every_stage_degraded_still_returns_a_result() {
        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Generative),
            Arc::new(FakeSearch::down()),
            Arc::new(FakeCatalog::with_results(1).failing_on("Global Bank")),
            Some(Arc::new(FakeGeneration::unreachable())),
        )
        .unwrap();
        let progress = RecordingProgress::default();

        let result = pipeline.run("  Global Bank ", &progress).await.unwrap();

        assert_eq!(result.insight.company_name, "Global Bank");
        assert_eq!(result.insight.industry_segment, IndustrySegment::Finance);
        assert!(result.insight.overview_items.is_empty());
        assert!(result.use_cases.is_empty());
        assert!(result.datasets.is_empty());

        let stages: Vec<Stage> = result.warnings.iter().map(|w| w.stage).collect();
        assert_eq!(stages, vec![Stage::Research, Stage::UseCases, Stage::Datasets]);
        assert_eq!(
            progress.phases.lock().unwrap().as_slice(),
            ["Researching company", "Generating use cases", "Collecting datasets"]
        );
        assert_eq!(*progress.done.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn stages_see_the_trimmed_company_name() {
        let search = Arc::new(acme_search());
        let catalog = Arc::new(FakeCatalog::with_results(1));
        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Static),
            search.clone(),
            catalog.clone(),
            None,
        )
        .unwrap();

        let result = pipeline
            .run("  Acme Cloud Software \t", &SilentProgress)
            .await
            .unwrap();

        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            ["Acme Cloud Software overview industry analysis business model"]
        );
        assert_eq!(catalog.keywords_queried()[0], "Acme Cloud Software");
        assert_eq!(result.datasets[0].source_use_case, "Acme Cloud Software");
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn stage_warnings_are_reported_once_not_logged_at_warn() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Generative),
            Arc::new(FakeSearch::down()),
            Arc::new(FakeCatalog::with_results(1).failing_on("Global Bank")),
            Some(Arc::new(FakeGeneration::unreachable())),
        )
        .unwrap();
        let progress = RecordingProgress::default();

        let result = pipeline.run("Global Bank", &progress).await.unwrap();

        assert_eq!(result.warnings.len(), 3);
        assert_eq!(progress.warnings.lock().unwrap().len(), 3);
        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.is_empty(), "unexpected warn-level output: {logged}");
    }

    #[tokio::test]
    async fn generated_use_cases_drive_keywords() {
        let catalog = Arc::new(FakeCatalog::with_results(1));
        let generation = Arc::new(FakeGeneration::suggesting(vec![
            scout_shared::UseCase::new("Grid Forecasting", "Predict hourly load."),
            scout_shared::UseCase::new("Panel Inspection", "Spot defects."),
        ]));
        let pipeline = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Generative),
            Arc::new(FakeSearch::answering(SearchResponse::default())),
            catalog.clone(),
            Some(generation),
        )
        .unwrap();

        let result = pipeline.run("Sunrise Solar", &SilentProgress).await.unwrap();

        assert_eq!(result.insight.industry_segment, IndustrySegment::Energy);
        assert_eq!(result.use_cases.len(), 2);
        assert_eq!(
            catalog.keywords_queried(),
            vec!["Sunrise Solar", "Grid", "Predict"]
        );
    }

    #[test]
    fn generative_without_client_is_a_config_error() {
        let err = PipelineOrchestrator::from_config(
            &config(UseCaseStrategy::Generative),
            Arc::new(FakeSearch::down()),
            Arc::new(FakeCatalog::with_results(0)),
            None,
        )
        .err()
        .expect("config error");
        assert!(matches!(err, ScoutError::Config { .. }));
    }

    #[test]
    fn validate_trims_and_rejects_blank() {
        assert_eq!(validate_company_name("  Acme  ").unwrap(), "Acme");
        assert!(validate_company_name("\t\n").is_err());
    }
}
