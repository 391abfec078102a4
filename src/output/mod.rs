//! Report Output
//!
//! Sinks that persist a finished [`CodebaseAnalysis`]. The JSON sink adds a
//! `metadata` object next to the report fields.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{CodebaseAnalysis, Result};

/// Run information written alongside the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// RFC 3339
    pub analysis_timestamp: String,
    pub analyzer_version: String,
    pub llm_provider: String,
    pub llm_model: String,
}

impl ReportMetadata {
    /// Stamped with the current time and this crate's version
    pub fn now(llm_provider: impl Into<String>, llm_model: impl Into<String>) -> Self {
        Self {
            analysis_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
            llm_provider: llm_provider.into(),
            llm_model: llm_model.into(),
        }
    }
}

/// On-disk layout: report fields at the top level plus `metadata`
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a CodebaseAnalysis,
    metadata: &'a ReportMetadata,
}

pub trait ReportSink {
    fn write(&self, report: &CodebaseAnalysis, metadata: &ReportMetadata) -> Result<()>;
}

/// Pretty-printed UTF-8 JSON file
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(report: &CodebaseAnalysis, metadata: &ReportMetadata) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ReportDocument { report, metadata })?)
    }
}

impl ReportSink for JsonFileSink {
    fn write(&self, report: &CodebaseAnalysis, metadata: &ReportMetadata) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = Self::render(report, metadata)?;
        fs::write(&self.path, content)?;
        info!("Report written to {}", self.path.display());

        Ok(())
    }
}
