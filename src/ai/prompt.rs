//! Prompt construction
//!
//! `PromptBuilder` assembles prompts from ordered sections so every narrative
//! request shares one layout: a role line, labelled fact blocks, then the
//! instruction.

use crate::ai::narrative::OverviewRequest;
use crate::constants::{aspects::KEY_CLASS_SAMPLE, overview};
use crate::types::{
    ComplexityMetrics, ComplexitySummary, ComponentMap, ComponentRole, ProjectContext,
    StatisticsSummary, title_case,
};

#[derive(Debug, Clone)]
enum PromptSection {
    Role(String),
    Facts { header: String, lines: Vec<String> },
    Block { header: String, content: String },
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: &str) -> Self {
        self.sections.push(PromptSection::Role(role.to_string()));
        self
    }

    /// Labelled bullet list
    pub fn facts(mut self, header: &str, lines: Vec<String>) -> Self {
        self.sections.push(PromptSection::Facts {
            header: header.to_string(),
            lines,
        });
        self
    }

    /// Labelled free-form block (file contents, listings)
    pub fn block(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Block {
            header: header.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text(content.to_string()));
        self
    }

    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role(role) => {
                    prompt.push_str(&role);
                }
                PromptSection::Facts { header, lines } => {
                    prompt.push_str(&header);
                    prompt.push(':');
                    for line in lines {
                        prompt.push_str("\n- ");
                        prompt.push_str(&line);
                    }
                }
                PromptSection::Block { header, content } => {
                    prompt.push_str(&header);
                    prompt.push_str(":\n");
                    prompt.push_str(&content);
                }
                PromptSection::Text(content) => {
                    prompt.push_str(&content);
                }
            }
            prompt.push_str("\n\n");
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Narrative Prompts
// =============================================================================

fn project_facts(context: &ProjectContext) -> Vec<String> {
    vec![
        format!("Type: {}", context.primary_framework()),
        format!("Language: {}", context.language),
    ]
}

pub fn complexity_interpretation(metrics: &ComplexityMetrics, context: &ProjectContext) -> String {
    PromptBuilder::new()
        .role("You are a code quality expert analyzing complexity metrics.")
        .facts("Project", project_facts(context))
        .facts(
            "Complexity Metrics",
            vec![
                format!("Average Complexity: {:.2}", metrics.average),
                format!("Maximum Complexity: {}", metrics.max),
                format!("Minimum Complexity: {}", metrics.min),
                format!("High Complexity Files: {}", metrics.high_complexity_files.len()),
            ],
        )
        .text(
            "Analyze these complexity metrics and give an overall assessment for this type of \
             project, what the numbers say about maintainability, and specific improvements if \
             any are needed. Keep it to 2-3 sentences. Put the text in the \"interpretation\" field.",
        )
        .build()
}

pub fn method_description(signature: &str, class_name: &str, annotations: &[String]) -> String {
    let annotations = if annotations.is_empty() {
        "none".to_string()
    } else {
        annotations.join(", ")
    };

    PromptBuilder::new()
        .role(
            "You are an expert software developer. Describe in one clear sentence what this \
             method does, based on its signature and annotations. Focus on the business \
             purpose, not implementation details.",
        )
        .facts(
            "Method",
            vec![
                format!("Class: {}", class_name),
                format!("Signature: {}", signature),
                format!("Annotations: {}", annotations),
            ],
        )
        .text("Put the sentence in the \"description\" field.")
        .build()
}

pub fn noteworthy_aspects(
    statistics: &StatisticsSummary,
    complexity: &ComplexitySummary,
    components: &ComponentMap,
    context: &ProjectContext,
) -> String {
    let (average, max, high) = match complexity.metrics() {
        Some(m) => (m.average, m.max, m.high_complexity_files.len()),
        None => (0.0, 0.0, 0),
    };

    PromptBuilder::new()
        .role("You are a software architect analyzing codebase quality and architecture.")
        .facts("Project", project_facts(context))
        .facts(
            "Statistics",
            vec![
                format!("Total Files: {}", statistics.total_files),
                format!("Total Lines: {}", statistics.total_lines),
                format!("Classes: {}", statistics.total_classes),
                format!("Business Logic Methods: {}", statistics.total_methods),
            ],
        )
        .facts(
            "Architecture",
            components
                .iter()
                .map(|(role, names)| format!("{}: {}", title_case(role.as_str()), names.len()))
                .collect(),
        )
        .facts(
            "Complexity",
            vec![
                format!("Average: {:.2}", average),
                format!("Max: {}", max),
                format!("High Complexity Files: {}", high),
            ],
        )
        .block("Key Classes", &key_classes(components))
        .text(
            "Identify 5-7 noteworthy aspects of this codebase: architecture quality and \
             patterns, code organization, complexity and maintainability, potential issues, \
             best practices followed and areas for improvement. Write each aspect as one \
             specific, actionable sentence in the \"aspects\" array.",
        )
        .build()
}

/// Up to five names per role for controllers, services and configurations
fn key_classes(components: &ComponentMap) -> String {
    let lines: Vec<String> = [
        ComponentRole::Controllers,
        ComponentRole::Services,
        ComponentRole::Configurations,
    ]
    .into_iter()
    .filter(|role| components.count(*role) > 0)
    .map(|role| {
        let sample: Vec<&str> = components
            .get(role)
            .iter()
            .take(KEY_CLASS_SAMPLE)
            .map(String::as_str)
            .collect();
        format!("- {}: {}", title_case(role.as_str()), sample.join(", "))
    })
    .collect();

    if lines.is_empty() {
        "No key components identified".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn recommendations(summary: &str) -> String {
    PromptBuilder::new()
        .role("You are a senior software architect conducting a code review.")
        .block("Codebase Analysis Summary", summary)
        .text(
            "Provide 5-7 actionable recommendations for improvement covering code quality, \
             maintainability, security, performance and best practices. Return them as \
             strings in the \"recommendations\" array.",
        )
        .build()
}

pub fn project_overview(request: &OverviewRequest) -> String {
    let readme = request
        .readme
        .as_deref()
        .map(|r| truncate_chars(r, overview::README_CHARS))
        .unwrap_or_else(|| "No README found".to_string());
    let build_file = request
        .build_file
        .as_deref()
        .map(|b| truncate_chars(b, overview::BUILD_FILE_CHARS))
        .unwrap_or_else(|| "No config file found".to_string());
    let frameworks = if request.frameworks.is_empty() {
        "Unknown".to_string()
    } else {
        request.frameworks.join(", ")
    };
    let structure: Vec<&str> = request
        .file_structure
        .iter()
        .take(overview::MAX_STRUCTURE_FILES)
        .map(String::as_str)
        .collect();

    PromptBuilder::new()
        .role(
            "You are an expert software architect analyzing a codebase. Produce a project \
             overview: name and description, main purpose, key technologies, architecture \
             pattern (e.g. MVC, microservices), main features and key dependencies.",
        )
        .text(&format!("Analyze this {} project.", request.language))
        .block("README Content", &readme)
        .block("Configuration File Content", &build_file)
        .facts(
            "Detected",
            vec![
                format!("Language: {}", request.language),
                format!("Frameworks: {}", frameworks),
            ],
        )
        .block(
            &format!("File Structure Sample (first {} files)", overview::MAX_STRUCTURE_FILES),
            &structure.join("\n"),
        )
        .build()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
