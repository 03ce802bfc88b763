//! Application configuration for UseCase Scout.
//!
//! User config lives at `~/.scout/scout.toml`.
//! CLI flags override config file values, which override defaults.
//! The file only ever names environment variables; secrets are read once
//! per run into an explicit [`Credentials`] object.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "scout.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".scout";

// ---------------------------------------------------------------------------
// Strategy / backend selectors
// ---------------------------------------------------------------------------

/// How use cases are produced from a company insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseStrategy {
    /// Fixed, industry-independent suggestions. No external call.
    #[default]
    Static,
    /// Ask the generation service for suggestions.
    Generative,
}

impl FromStr for UseCaseStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "generative" => Ok(Self::Generative),
            other => Err(format!(
                "unknown strategy '{other}': expected 'static' or 'generative'"
            )),
        }
    }
}

/// Which dataset catalog the collector queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogBackend {
    /// Kaggle dataset search API.
    #[default]
    Kaggle,
    /// Web search for "<keyword> dataset" through the search service.
    Web,
}

impl FromStr for CatalogBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kaggle" => Ok(Self::Kaggle),
            "web" => Ok(Self::Web),
            other => Err(format!(
                "unknown catalog '{other}': expected 'kaggle' or 'web'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Config structs (matching scout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// SerpApi (web search) settings.
    #[serde(default)]
    pub serpapi: SerpApiConfig,

    /// Kaggle dataset catalog settings.
    #[serde(default)]
    pub kaggle: KaggleConfig,

    /// OpenRouter (use case generation) settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum overview items (and related questions) kept from the search.
    #[serde(default = "default_overview_limit")]
    pub overview_limit: usize,

    /// Catalog results requested per keyword.
    #[serde(default = "default_dataset_results")]
    pub dataset_results: usize,

    /// Deadline applied to every external call.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Use case strategy.
    #[serde(default)]
    pub strategy: UseCaseStrategy,

    /// Dataset catalog backend.
    #[serde(default)]
    pub catalog: CatalogBackend,

    /// Issue per-keyword catalog queries concurrently.
    #[serde(default = "default_true")]
    pub concurrent_catalog: bool,

    /// Output budget passed to the generation service.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Cap on generated use cases.
    #[serde(default = "default_max_use_cases")]
    pub max_use_cases: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            overview_limit: default_overview_limit(),
            dataset_results: default_dataset_results(),
            call_timeout_secs: default_call_timeout_secs(),
            strategy: UseCaseStrategy::default(),
            catalog: CatalogBackend::default(),
            concurrent_catalog: true,
            max_tokens: default_max_tokens(),
            max_use_cases: default_max_use_cases(),
        }
    }
}

fn default_overview_limit() -> usize {
    3
}
fn default_dataset_results() -> usize {
    3
}
fn default_call_timeout_secs() -> u64 {
    20
}
fn default_true() -> bool {
    true
}
fn default_max_tokens() -> u32 {
    512
}
fn default_max_use_cases() -> usize {
    5
}

/// `[serpapi]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_serpapi_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_serpapi_base_url")]
    pub base_url: String,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_serpapi_key_env(),
            base_url: default_serpapi_base_url(),
        }
    }
}

fn default_serpapi_key_env() -> String {
    "SERPAPI_API_KEY".into()
}
fn default_serpapi_base_url() -> String {
    "https://serpapi.com".into()
}

/// `[kaggle]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KaggleConfig {
    #[serde(default = "default_kaggle_username_env")]
    pub username_env: String,

    #[serde(default = "default_kaggle_key_env")]
    pub key_env: String,

    #[serde(default = "default_kaggle_base_url")]
    pub base_url: String,
}

impl Default for KaggleConfig {
    fn default() -> Self {
        Self {
            username_env: default_kaggle_username_env(),
            key_env: default_kaggle_key_env(),
            base_url: default_kaggle_base_url(),
        }
    }
}

fn default_kaggle_username_env() -> String {
    "KAGGLE_USERNAME".into()
}
fn default_kaggle_key_env() -> String {
    "KAGGLE_KEY".into()
}
fn default_kaggle_base_url() -> String {
    "https://www.kaggle.com".into()
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_openrouter_key_env")]
    pub api_key_env: String,

    /// Default model to use for use case generation.
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openrouter_key_env(),
            default_model: default_model(),
            base_url: default_openrouter_base_url(),
        }
    }
}

fn default_openrouter_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration: merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub overview_limit: usize,
    pub dataset_results: usize,
    /// Deadline for each individual external call.
    pub call_timeout: Duration,
    pub strategy: UseCaseStrategy,
    pub catalog: CatalogBackend,
    pub concurrent_catalog: bool,
    pub max_tokens: u32,
    pub max_use_cases: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        let d = &config.defaults;
        Self {
            overview_limit: d.overview_limit,
            dataset_results: d.dataset_results,
            call_timeout: Duration::from_secs(d.call_timeout_secs),
            strategy: d.strategy,
            catalog: d.catalog,
            concurrent_catalog: d.concurrent_catalog,
            max_tokens: d.max_tokens,
            max_use_cases: d.max_use_cases,
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A secret string whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Kaggle basic-auth pair.
#[derive(Debug, Clone)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: ApiKey,
}

/// Credentials for one pipeline run, resolved once and handed to client
/// constructors.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub serpapi_key: ApiKey,
    /// Present when the Kaggle catalog is selected.
    pub kaggle: Option<KaggleCredentials>,
    /// Present when the generative strategy is selected.
    pub openrouter_key: Option<ApiKey>,
}

/// Read the credentials the selected strategy and catalog need.
///
/// Fails with a config error naming the first missing variable.
pub fn resolve_credentials(
    config: &AppConfig,
    strategy: UseCaseStrategy,
    catalog: CatalogBackend,
) -> Result<Credentials> {
    resolve_credentials_with(config, strategy, catalog, |name| std::env::var(name).ok())
}

/// Like [`resolve_credentials`] with an injectable variable lookup.
pub fn resolve_credentials_with(
    config: &AppConfig,
    strategy: UseCaseStrategy,
    catalog: CatalogBackend,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let require = |var_name: &str, hint: &str| -> Result<String> {
        match lookup(var_name) {
            Some(val) if !val.trim().is_empty() => Ok(val),
            _ => Err(ScoutError::config(format!(
                "credential not found. Set the {var_name} environment variable.\n{hint}"
            ))),
        }
    };

    let serpapi_key = ApiKey::new(require(
        &config.serpapi.api_key_env,
        "Get a key at https://serpapi.com/manage-api-key",
    )?);

    let kaggle = match catalog {
        CatalogBackend::Kaggle => {
            let hint = "Create an API token at https://www.kaggle.com/settings";
            Some(KaggleCredentials {
                username: require(&config.kaggle.username_env, hint)?,
                key: ApiKey::new(require(&config.kaggle.key_env, hint)?),
            })
        }
        CatalogBackend::Web => None,
    };

    let openrouter_key = match strategy {
        UseCaseStrategy::Generative => Some(ApiKey::new(require(
            &config.openrouter.api_key_env,
            "Get a key at https://openrouter.ai/keys",
        )?)),
        UseCaseStrategy::Static => None,
    };

    Ok(Credentials {
        serpapi_key,
        kaggle,
        openrouter_key,
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.scout/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| ScoutError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.scout/scout.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ScoutError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ScoutError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ScoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| ScoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ScoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
