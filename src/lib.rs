//! codebrief - AI-Assisted Codebase Report Generator
//!
//! Parses a repository, classifies its classes into architectural roles,
//! computes statistics and cyclomatic complexity, picks out key business
//! methods and combines all of it with LLM narrative into one JSON report.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use codebrief::{Config, OfflineNarrator};
//! use codebrief::cli::commands::analyze::analyze_codebase;
//!
//! let mut config = Config::default();
//! config.analysis.path = "path/to/project".into();
//! let report = analyze_codebase(&config, Arc::new(OfflineNarrator)).await?;
//! println!("{} classes", report.statistics.total_classes);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM providers and the narrative service
//! - [`analyzer`]: File scanning, project detection, tree-sitter parsing
//! - [`pipeline`]: Classification, statistics, complexity, key methods, aspects, assembly
//! - [`output`]: Report sinks
//! - [`config`]: Layered configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod output;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::{CodebaseAnalysis, CodebriefError, ErrorCategory, Result};

pub use ai::{LlmNarrator, LlmProvider, NarrativeService, OfflineNarrator, create_provider};
pub use analyzer::{FileScanner, Language, ProjectDetector, SourceParser};
pub use output::{JsonFileSink, ReportMetadata, ReportSink};
pub use pipeline::{AnalysisPipeline, PipelineOptions};
