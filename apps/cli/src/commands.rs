//! CLI command definitions, routing, and tracing setup.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use scout_clients::{
    CatalogClient, GenerationClient, KaggleCatalog, OpenRouterGenerator, SearchClient,
    SerpApiClient, WebDatasetCatalog,
};
use scout_core::{PipelineOrchestrator, ProgressReporter, validate_company_name};
use scout_shared::{
    AppConfig, CatalogBackend, Credentials, PipelineConfig, PipelineResult, StageWarning,
    UseCaseStrategy, init_config, load_config, resolve_credentials,
};

use crate::report;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// UseCase Scout: from a company name to AI use cases and datasets.
#[derive(Parser)]
#[command(
    name = "scout",
    version,
    about = "Research a company, suggest AI/ML use cases, and find candidate datasets.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full research pipeline for a company.
    Run {
        /// Company name to research.
        company: String,

        /// Use case strategy: static or generative (defaults to config).
        #[arg(short, long)]
        strategy: Option<UseCaseStrategy>,

        /// Dataset catalog: kaggle or web (defaults to config).
        #[arg(short, long)]
        catalog: Option<CatalogBackend>,

        /// Catalog results per keyword.
        #[arg(long)]
        max_results: Option<usize>,

        /// Deadline in seconds for each external call.
        #[arg(long)]
        timeout: Option<u64>,

        /// Query the catalog one keyword at a time.
        #[arg(long)]
        sequential: bool,

        /// Print the result as JSON instead of a text report.
        #[arg(long)]
        json: bool,
    },

    /// Show which industry segment a company name maps to.
    Classify {
        /// Company name to classify.
        company: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// Flag overrides for `scout run`.
struct RunOverrides {
    strategy: Option<UseCaseStrategy>,
    catalog: Option<CatalogBackend>,
    max_results: Option<usize>,
    timeout: Option<u64>,
    sequential: bool,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "scout=warn",
        1 => "scout=info",
        2 => "scout=debug",
        _ => "scout=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `--json` output stays parseable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            company,
            strategy,
            catalog,
            max_results,
            timeout,
            sequential,
            json,
        } => {
            let overrides = RunOverrides {
                strategy,
                catalog,
                max_results,
                timeout,
                sequential,
            };
            cmd_run(&company, overrides, json).await
        }
        Command::Classify { company } => cmd_classify(&company),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(company: &str, overrides: RunOverrides, json: bool) -> Result<()> {
    // Validate input and credentials before doing anything
    let company = validate_company_name(company)?;
    let config = load_config()?;
    let pipeline_config = merge_overrides(PipelineConfig::from(&config), &overrides);
    let credentials =
        resolve_credentials(&config, pipeline_config.strategy, pipeline_config.catalog)?;

    let pipeline = build_pipeline(&config, &pipeline_config, credentials)?;

    info!(
        company,
        strategy = ?pipeline_config.strategy,
        catalog = ?pipeline_config.catalog,
        "researching company"
    );

    let reporter = CliProgress::new(!json);
    let result = pipeline.run(company, &reporter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result));
    }

    Ok(())
}

fn merge_overrides(mut config: PipelineConfig, overrides: &RunOverrides) -> PipelineConfig {
    if let Some(strategy) = overrides.strategy {
        config.strategy = strategy;
    }
    if let Some(catalog) = overrides.catalog {
        config.catalog = catalog;
    }
    if let Some(n) = overrides.max_results {
        config.dataset_results = n;
    }
    if let Some(secs) = overrides.timeout {
        config.call_timeout = Duration::from_secs(secs);
    }
    if overrides.sequential {
        config.concurrent_catalog = false;
    }
    config
}

/// Construct the real clients for one run and wire them into a pipeline.
fn build_pipeline(
    config: &AppConfig,
    pipeline_config: &PipelineConfig,
    credentials: Credentials,
) -> Result<PipelineOrchestrator> {
    let timeout = pipeline_config.call_timeout;

    let search: Arc<dyn SearchClient> = Arc::new(SerpApiClient::new(
        &config.serpapi.base_url,
        credentials.serpapi_key,
        timeout,
    )?);

    let catalog: Arc<dyn CatalogClient> = match pipeline_config.catalog {
        CatalogBackend::Kaggle => {
            let kaggle = credentials
                .kaggle
                .ok_or_else(|| eyre!("Kaggle catalog selected but Kaggle credentials are missing"))?;
            Arc::new(KaggleCatalog::new(&config.kaggle.base_url, kaggle, timeout)?)
        }
        CatalogBackend::Web => Arc::new(WebDatasetCatalog::new(search.clone())),
    };

    let generation = match credentials.openrouter_key {
        Some(key) => {
            let client: Arc<dyn GenerationClient> = Arc::new(OpenRouterGenerator::new(
                &config.openrouter.base_url,
                key,
                &config.openrouter.default_model,
                timeout,
            )?);
            Some(client)
        }
        None => None,
    };

    Ok(PipelineOrchestrator::from_config(
        pipeline_config,
        search,
        catalog,
        generation,
    )?)
}

fn cmd_classify(company: &str) -> Result<()> {
    let company = validate_company_name(company)?;
    match scout_core::explain(company) {
        Some((segment, keyword)) => println!("{segment} (matched \"{keyword}\")"),
        None => println!("{}", scout_shared::IndustrySegment::Unclassified),
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new(visible: bool) -> Self {
        if !visible {
            return Self {
                spinner: ProgressBar::hidden(),
            };
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn warning(&self, warning: &StageWarning) {
        self.spinner
            .suspend(|| eprintln!("warning [{}]: {}", warning.stage, warning.message));
    }

    fn done(&self, _result: &PipelineResult) {
        self.spinner.finish_and_clear();
    }
}
