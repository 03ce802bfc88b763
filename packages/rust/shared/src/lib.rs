//! Shared types, error model, and configuration for UseCase Scout.
//!
//! This crate is the foundation depended on by all other scout crates.
//! It provides:
//! - [`ScoutError`]: the unified error type
//! - Domain types ([`CompanyInsight`], [`UseCase`], [`DatasetRecord`], [`PipelineResult`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], [`Credentials`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiKey, AppConfig, CatalogBackend, Credentials, DefaultsConfig, KaggleConfig,
    KaggleCredentials, OpenRouterConfig, PipelineConfig, SerpApiConfig, UseCaseStrategy,
    config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials, resolve_credentials_with,
};
pub use error::{Result, ScoutError};
pub use types::{
    CompanyInsight, DatasetRecord, IndustrySegment, OverviewItem, PipelineResult, RunId, Stage,
    StageWarning, UseCase,
};
