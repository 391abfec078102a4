//! Source Parser Module
//!
//! Turns scanned files into [`ParsedFile`] records. Java goes through the
//! tree-sitter parser; everything else (and any Java file that fails to
//! parse) becomes a line-count-only record.

pub mod java;
pub mod language;
pub mod traits;

pub use java::JavaParser;
pub use language::Language;
pub use traits::{
    LineCounts, Parser, count_lines, create_ts_parser, generic_record, get_node_text, query_texts,
};

use tracing::{debug, warn};

use crate::analyzer::scanner::ScannedFile;
use crate::pipeline::BusinessRules;
use crate::types::{ParsedFile, Result};

/// Dispatches each file to the parser for its language
pub struct SourceParser {
    java: JavaParser,
    project_language: Language,
}

impl SourceParser {
    /// `project_language` tags files whose own extension is not recognized
    pub fn new(rules: BusinessRules, project_language: Language) -> Result<Self> {
        Ok(Self {
            java: JavaParser::new(rules)?,
            project_language,
        })
    }

    /// Parse every readable file, preserving scan order. Unreadable files are skipped.
    pub fn parse_files(&self, files: &[ScannedFile]) -> Vec<ParsedFile> {
        let mut parsed = Vec::with_capacity(files.len());

        for file in files {
            match std::fs::read_to_string(&file.path) {
                Ok(content) => parsed.push(self.parse_content(&file.relative, &content)),
                Err(e) => warn!("Skipping unreadable file {}: {}", file.relative, e),
            }
        }

        debug!("Parsed {} of {} files", parsed.len(), files.len());
        parsed
    }

    pub fn parse_content(&self, path: &str, content: &str) -> ParsedFile {
        let language = match Language::from_path(path) {
            Language::Unknown => self.project_language,
            known => known,
        };

        if language == self.java.language() {
            match self.java.parse(path, content) {
                Ok(file) => return file,
                Err(e) => warn!("Falling back to line counts for {}: {}", path, e),
            }
        }

        generic_record(path, content, language)
    }
}
