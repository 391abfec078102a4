use tree_sitter::{Query, QueryCursor, StreamingIterator};

use super::Language;
use crate::types::{CodebriefError, ParsedFile, Result};

pub trait Parser: Send + Sync {
    /// Parse one file. `path` is the relative path recorded in the result.
    fn parse(&self, path: &str, content: &str) -> Result<ParsedFile>;
    fn language(&self) -> Language;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            e
        );
        ""
    })
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| CodebriefError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Execute a query and collect the text of every capture, in match order
pub fn query_texts(
    language: &tree_sitter::Language,
    query_str: &str,
    root: tree_sitter::Node,
    content: &[u8],
) -> Vec<String> {
    let mut results = Vec::new();

    if let Ok(query) = Query::new(language, query_str) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, content);

        while let Some(m) = matches.next() {
            for cap in m.captures.iter() {
                results.push(get_node_text(cap.node, content).to_string());
            }
        }
    }

    results
}

/// Line counts of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
}

/// Count lines. Total counts `\n`-separated segments (a trailing newline adds
/// an empty last line). Code lines are non-blank and do not start with
/// `comment_prefix` after trimming.
pub fn count_lines(content: &str, comment_prefix: &str) -> LineCounts {
    let total = content.split('\n').count();
    let code = content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(comment_prefix))
        .count();

    LineCounts {
        total,
        code,
        comment: total - code,
    }
}

/// Line-count-only record for files without a structural parser
pub fn generic_record(path: &str, content: &str, language: Language) -> ParsedFile {
    let lines = count_lines(content, language.comment_prefix());
    ParsedFile::new(path, language.tag()).with_lines(lines.total, lines.code)
}
