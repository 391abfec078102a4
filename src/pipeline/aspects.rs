//! Aspect Identifier
//!
//! Noteworthy observations come from the narrative service when it yields at
//! least one usable line. Otherwise a fixed rule set produces them. The two
//! sources are never merged.

use tracing::debug;

use crate::ai::NarrativeService;
use crate::constants::aspects::*;
use crate::types::{
    ComplexitySummary, ComponentMap, ComponentRole, ProjectContext, StatisticsSummary,
};

pub async fn identify_aspects(
    statistics: &StatisticsSummary,
    complexity: &ComplexitySummary,
    components: &ComponentMap,
    context: &ProjectContext,
    narrator: &dyn NarrativeService,
    threshold: f64,
) -> Vec<String> {
    if let Some(lines) = narrator
        .identify_aspects(statistics, complexity, components, context)
        .await
    {
        let aspects = clean_aspect_lines(&lines);
        if !aspects.is_empty() {
            return aspects;
        }
        debug!("Narrative aspects unusable, falling back to rules");
    }

    rule_based_aspects(statistics, complexity, components, threshold)
}

/// Strip list markers, drop headings and lines shorter than the minimum
pub fn clean_aspect_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|l| l.lines())
        .map(str::trim)
        .filter(|l| !l.starts_with('#'))
        .map(strip_marker)
        .filter(|l| l.chars().count() >= MIN_ASPECT_LEN)
        .map(String::from)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();

    if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))
    {
        return rest.trim();
    }

    // Numbered markers: "1." or "12)"
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }

    line
}

/// Deterministic observations derived from the computed figures
pub fn rule_based_aspects(
    statistics: &StatisticsSummary,
    complexity: &ComplexitySummary,
    components: &ComponentMap,
    threshold: f64,
) -> Vec<String> {
    let mut aspects = Vec::new();

    let controllers = components.count(ComponentRole::Controllers);
    let services = components.count(ComponentRole::Services);
    if controllers > 0 && services > 0 {
        aspects.push(format!(
            "Well-structured MVC architecture with {} controllers and {} services",
            controllers, services
        ));
    }

    let entities = components.count(ComponentRole::Entities);
    if entities > 0 {
        aspects.push(format!("Data model contains {} entity classes", entities));
    }

    if let Some(metrics) = complexity.metrics() {
        if metrics.average < LOW_AVG_COMPLEXITY {
            aspects.push(format!(
                "Low code complexity (avg: {:.1}) indicates maintainable code",
                metrics.average
            ));
        } else if metrics.average > HIGH_AVG_COMPLEXITY {
            aspects.push(format!(
                "High code complexity (avg: {:.1}) may require refactoring",
                metrics.average
            ));
        }

        if !metrics.high_complexity_files.is_empty() {
            aspects.push(format!(
                "{} files with high complexity (>{}) need attention",
                metrics.high_complexity_files.len(),
                threshold
            ));
        }
    }

    let lines = statistics.total_lines;
    if lines < COMPACT_LINES {
        aspects.push(format!(
            "Compact codebase ({} lines) - easy to navigate and understand",
            lines
        ));
    } else if lines > LARGE_LINES {
        aspects.push(format!(
            "Large codebase ({} lines) - consider modularization",
            lines
        ));
    }

    let methods_per_class = if statistics.total_classes > 0 {
        statistics.total_methods as f64 / statistics.total_classes as f64
    } else {
        0.0
    };
    if methods_per_class < FEW_METHODS_PER_CLASS {
        aspects.push(format!(
            "Classes have few business methods (avg: {:.1}) - likely following single responsibility principle",
            methods_per_class
        ));
    }

    if components
        .get(ComponentRole::Configurations)
        .iter()
        .any(|name| name == SECURITY_CONFIG_CLASS)
    {
        aspects.push("Spring Security configured for authentication and authorization".to_string());
    }

    aspects
}
