//! Analyze Command
//!
//! Detect → scan → parse → overview → pipeline → JSON report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::ai::{LlmNarrator, OfflineNarrator, create_provider};
use crate::analyzer::{FileScanner, ProjectDetector, SourceParser};
use crate::cli::Output;
use crate::config::{Config, ConfigLoader};
use crate::output::{JsonFileSink, ReportMetadata, ReportSink};
use crate::pipeline::{AnalysisPipeline, SharedNarrator, build_overview};
use crate::types::{CodebaseAnalysis, Result};

const OFFLINE_PROVIDER: &str = "offline";
const OFFLINE_MODEL: &str = "none";

/// Command-line overrides, applied on top of the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub path: Option<PathBuf>,
    pub language: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub output: Option<PathBuf>,
    pub offline: bool,
}

impl AnalyzeOptions {
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.path {
            config.analysis.path = path.clone();
        }
        if let Some(language) = &self.language {
            config.analysis.target_language = language.clone();
        }
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = Some(model.clone());
        }
        if let Some(output) = &self.output {
            config.analysis.output = output.clone();
        }
        if self.offline {
            config.llm.enabled = false;
        }
    }
}

/// Narrative service plus the provider/model pair recorded in the report
pub struct NarratorChoice {
    pub narrator: SharedNarrator,
    pub provider: String,
    pub model: String,
}

pub fn select_narrator(config: &Config) -> Result<NarratorChoice> {
    if !config.llm.enabled {
        return Ok(NarratorChoice {
            narrator: Arc::new(OfflineNarrator),
            provider: OFFLINE_PROVIDER.to_string(),
            model: OFFLINE_MODEL.to_string(),
        });
    }

    let provider = create_provider(&config.llm.provider_config())?;
    let narrator = LlmNarrator::new(provider);
    Ok(NarratorChoice {
        provider: narrator.provider_name().to_string(),
        model: narrator.model().to_string(),
        narrator: Arc::new(narrator),
    })
}

pub fn run(config_path: Option<&Path>, options: AnalyzeOptions, out: &Output) -> Result<()> {
    let mut config = ConfigLoader::load(config_path)?;
    options.apply(&mut config);
    config.validate()?;

    let choice = select_narrator(&config)?;
    if config.llm.enabled {
        out.info(&format!("Using {} ({})", choice.provider, choice.model));
    } else {
        out.info("Running offline: narrative sections stay empty");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(analyze_codebase(&config, choice.narrator))?;

    let sink = JsonFileSink::new(&config.analysis.output);
    sink.write(&report, &ReportMetadata::now(choice.provider, choice.model))?;

    out.report_summary(&report, sink.path());
    Ok(())
}

/// Run the whole analysis for `config.analysis.path`
pub async fn analyze_codebase(config: &Config, narrator: SharedNarrator) -> Result<CodebaseAnalysis> {
    let root = config.analysis.path.as_path();

    let detection = ProjectDetector::new(root).detect(config.analysis.language()?)?;
    info!(
        language = %detection.language,
        project = %detection.project_name,
        "Detected project"
    );

    let files = FileScanner::new(root)
        .with_include(&config.analysis.include)?
        .with_exclude(&config.analysis.exclude)?
        .with_extensions(detection.language.extensions())
        .with_max_file_size(config.analysis.max_file_size)
        .scan()?;
    info!("Found {} source files", files.len());

    let parser = SourceParser::new(config.rules.clone(), detection.language)?;
    let parsed = parser.parse_files(&files);

    let source_paths: Vec<String> = files.iter().map(|f| f.relative.clone()).collect();
    let overview = build_overview(root, &detection, &source_paths, narrator.as_ref()).await;

    let pipeline = AnalysisPipeline::new(narrator, config.pipeline.clone());
    Ok(pipeline.analyze(&parsed, overview, &detection.context).await)
}
