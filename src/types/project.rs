//! Project-level type definitions
//!
//! Detection results and the high-level overview placed at the top of the
//! report.

use serde::{Deserialize, Serialize};

/// Detected project facts consumed read-only by the narrative stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    /// Declared language tag (`java`, `python`, ..., `unknown`)
    pub language: String,
    pub frameworks: Vec<String>,
    pub build_tools: Vec<String>,
    pub package_manager: Option<String>,
}

impl ProjectContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    /// First detected framework, or `Unknown`
    pub fn primary_framework(&self) -> &str {
        self.frameworks.first().map(String::as_str).unwrap_or("Unknown")
    }

    /// Language tag with the first letter upper-cased (`java` -> `Java`)
    pub fn language_title(&self) -> String {
        title_case(&self.language)
    }
}

/// High-level description of the analyzed project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectOverview {
    pub project_name: String,
    pub description: String,
    pub purpose: String,
    pub key_technologies: Vec<String>,
    pub architecture_pattern: Option<String>,
    pub main_features: Vec<String>,
    pub dependencies: Vec<String>,
}

pub(crate) fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_framework_defaults_to_unknown() {
        let ctx = ProjectContext::new("java");
        assert_eq!(ctx.primary_framework(), "Unknown");

        let ctx = ProjectContext {
            frameworks: vec!["Spring Boot".to_string(), "React".to_string()],
            ..ProjectContext::new("java")
        };
        assert_eq!(ctx.primary_framework(), "Spring Boot");
    }

    #[test]
    fn test_language_title() {
        assert_eq!(ProjectContext::new("java").language_title(), "Java");
        assert_eq!(ProjectContext::new("").language_title(), "");
    }
}
