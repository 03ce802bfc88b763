//! Core pipeline orchestration and domain logic for UseCase Scout.
//!
//! This crate ties together company research, use case generation and
//! dataset collection into one sequential run (`PipelineOrchestrator::run`).

pub mod classifier;
pub mod datasets;
mod deadline;
pub mod outcome;
pub mod pipeline;
pub mod research;
pub mod usecases;

#[cfg(test)]
mod testing;

pub use classifier::{classify, explain};
pub use datasets::{DatasetCollector, derive_keywords};
pub use outcome::StageOutcome;
pub use pipeline::{PipelineOrchestrator, ProgressReporter, SilentProgress, validate_company_name};
pub use research::CompanyResearcher;
pub use usecases::{UseCaseGenerator, static_use_cases};
