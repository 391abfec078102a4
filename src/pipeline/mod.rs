//! Analysis Pipeline
//!
//! Turns parsed files into the final report.
//!
//! ```text
//! ParsedFile[] → Components → { Statistics, Complexity, Key Methods }
//!                                        ↓
//!                        Aspects → Recommendations → Assembly
//! ```
//!
//! Stages run strictly in order and every narrative call is awaited before
//! the next one is issued. Narrative failures degrade to absent values and
//! never abort a run.

pub mod aspects;
pub mod assembler;
pub mod business;
pub mod complexity;
pub mod components;
pub mod key_methods;
pub mod overview;
pub mod statistics;

pub use aspects::{clean_aspect_lines, identify_aspects, rule_based_aspects};
pub use assembler::{ReportParts, assemble, generate_recommendations, recommendation_summary};
pub use business::BusinessRules;
pub use complexity::{compute_metrics, summarize_complexity};
pub use components::{classify_class, classify_components};
pub use key_methods::extract_key_methods;
pub use overview::{build_overview, merge_overview};
pub use statistics::compute_statistics;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::ai::NarrativeService;
use crate::constants::complexity::HIGH_COMPLEXITY_THRESHOLD;
use crate::types::{CodebaseAnalysis, ParsedFile, ProjectContext, ProjectOverview};

/// Shared narrative service for the pipeline stages
pub type SharedNarrator = Arc<dyn NarrativeService>;

/// Knobs for the `[pipeline]` configuration table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Files whose complexity exceeds this are flagged
    pub high_complexity_threshold: f64,
    /// Ask the narrative service to interpret complexity figures
    pub interpret_complexity: bool,
    /// Ask the narrative service to describe each key method
    pub describe_methods: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            high_complexity_threshold: HIGH_COMPLEXITY_THRESHOLD,
            interpret_complexity: true,
            describe_methods: true,
        }
    }
}

/// Report-producing pipeline over already parsed files
pub struct AnalysisPipeline {
    narrator: SharedNarrator,
    options: PipelineOptions,
}

impl AnalysisPipeline {
    pub fn new(narrator: SharedNarrator, options: PipelineOptions) -> Self {
        Self { narrator, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    #[instrument(skip_all, fields(files = files.len()))]
    pub async fn analyze(
        &self,
        files: &[ParsedFile],
        overview: ProjectOverview,
        context: &ProjectContext,
    ) -> CodebaseAnalysis {
        let narrator = self.narrator.as_ref();
        let threshold = self.options.high_complexity_threshold;

        let components = classify_components(files);
        info!("Classified {} components", components.total());

        let statistics = compute_statistics(files);

        let complexity_summary = summarize_complexity(
            files,
            context,
            narrator,
            threshold,
            self.options.interpret_complexity,
        )
        .await;

        let key_methods =
            extract_key_methods(files, &components, narrator, self.options.describe_methods).await;
        info!("Extracted {} key methods", key_methods.len());

        let noteworthy_aspects = identify_aspects(
            &statistics,
            &complexity_summary,
            &components,
            context,
            narrator,
            threshold,
        )
        .await;

        let recommendations = generate_recommendations(&statistics, &overview, narrator).await;

        assemble(ReportParts {
            overview,
            statistics,
            key_methods,
            key_components: components,
            complexity_summary,
            recommendations,
            noteworthy_aspects,
        })
    }
}
