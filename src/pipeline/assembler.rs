//! Report Assembler and recommendation request

use tracing::debug;

use crate::ai::NarrativeService;
use crate::types::{
    CodebaseAnalysis, ComplexitySummary, ComponentMap, KeyMethodSummary, ProjectOverview,
    StatisticsSummary,
};

/// Stage outputs gathered before assembly
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub overview: ProjectOverview,
    pub statistics: StatisticsSummary,
    pub key_methods: Vec<KeyMethodSummary>,
    pub key_components: ComponentMap,
    pub complexity_summary: ComplexitySummary,
    pub recommendations: Vec<String>,
    pub noteworthy_aspects: Vec<String>,
}

/// Combine stage outputs into the final report
pub fn assemble(parts: ReportParts) -> CodebaseAnalysis {
    CodebaseAnalysis {
        overview: parts.overview,
        statistics: parts.statistics,
        key_methods: parts.key_methods,
        key_components: parts.key_components,
        complexity_summary: parts.complexity_summary,
        recommendations: parts.recommendations,
        noteworthy_aspects: parts.noteworthy_aspects,
    }
}

/// Short summary handed to the narrative service for recommendations
pub fn recommendation_summary(statistics: &StatisticsSummary, technologies: &[String]) -> String {
    format!(
        "Project Statistics:\n\
         - Files: {}\n\
         - Classes: {}\n\
         - Business Logic Methods: {}\n\
         - Total Lines: {}\n\
         - Average File Size: {} lines\n\
         \n\
         Technology Stack: {}",
        statistics.total_files,
        statistics.total_classes,
        statistics.total_methods,
        statistics.total_lines,
        statistics.average_file_size,
        technologies.join(", ")
    )
}

/// One recommendations request; failure yields an empty list
pub async fn generate_recommendations(
    statistics: &StatisticsSummary,
    overview: &ProjectOverview,
    narrator: &dyn NarrativeService,
) -> Vec<String> {
    let summary = recommendation_summary(statistics, &overview.key_technologies);
    let recommendations = narrator.recommend(&summary).await;
    debug!("Received {} recommendations", recommendations.len());
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::narrative::testing::ScriptedNarrator;

    fn statistics() -> StatisticsSummary {
        StatisticsSummary {
            total_files: 12,
            total_lines: 2400,
            total_code_lines: 2000,
            total_classes: 10,
            total_methods: 25,
            average_file_size: 200,
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_text() {
        let summary = recommendation_summary(
            &statistics(),
            &["Java".to_string(), "Spring Boot".to_string()],
        );

        assert_eq!(
            summary,
            "Project Statistics:\n- Files: 12\n- Classes: 10\n- Business Logic Methods: 25\n\
             - Total Lines: 2400\n- Average File Size: 200 lines\n\nTechnology Stack: Java, Spring Boot"
        );
    }

    #[tokio::test]
    async fn test_recommendations_single_call() {
        let narrator = ScriptedNarrator::default()
            .with_recommendations(&["Add integration tests", "Introduce DTOs"]);

        let recs =
            generate_recommendations(&statistics(), &ProjectOverview::default(), &narrator).await;

        assert_eq!(recs, vec!["Add integration tests", "Introduce DTOs"]);
        assert_eq!(narrator.calls("recommend"), 1);
    }

    #[tokio::test]
    async fn test_failed_recommendations_are_empty() {
        let narrator = ScriptedNarrator::default();
        let recs =
            generate_recommendations(&statistics(), &ProjectOverview::default(), &narrator).await;
        assert!(recs.is_empty());
    }

    #[test]
    fn test_assemble_keeps_parts() {
        let mut components = ComponentMap::default();
        components.push(crate::types::ComponentRole::Services, "BillingService");

        let report = assemble(ReportParts {
            overview: ProjectOverview {
                project_name: "billing".to_string(),
                ..Default::default()
            },
            statistics: statistics(),
            key_methods: vec![],
            key_components: components.clone(),
            complexity_summary: ComplexitySummary::no_data(),
            recommendations: vec!["Add tests".to_string()],
            noteworthy_aspects: vec!["Compact codebase (2400 lines) - easy to navigate and understand".to_string()],
        });

        assert_eq!(report.overview.project_name, "billing");
        assert_eq!(report.key_components, components);
        assert!(report.complexity_summary.is_no_data());
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.noteworthy_aspects.len(), 1);
    }
}
