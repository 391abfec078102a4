//! Overview Builder
//!
//! Gathers README, build file and a file-structure sample, asks the
//! narrative service for a project overview and fills every missing field
//! from detection results.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::ai::{NarrativeService, OverviewDraft, OverviewRequest};
use crate::analyzer::ProjectDetection;
use crate::constants::overview::README_NAMES;
use crate::types::{ProjectOverview, title_case};

pub async fn build_overview(
    root: &Path,
    detection: &ProjectDetection,
    source_paths: &[String],
    narrator: &dyn NarrativeService,
) -> ProjectOverview {
    let request = OverviewRequest {
        readme: read_readme(root),
        build_file: detection.build_file.as_deref().and_then(read_non_empty),
        file_structure: source_paths.to_vec(),
        language: detection.context.language.clone(),
        frameworks: detection.context.frameworks.clone(),
    };

    let draft = narrator.project_overview(&request).await.unwrap_or_default();
    if draft.is_empty() {
        debug!("No narrative overview, using detected facts");
    }

    merge_overview(draft, detection)
}

/// Overlay a draft on the deterministic defaults
pub fn merge_overview(draft: OverviewDraft, detection: &ProjectDetection) -> ProjectOverview {
    let language = &detection.context.language;
    let frameworks = &detection.context.frameworks;

    let key_technologies = draft.key_technologies.unwrap_or_else(|| {
        std::iter::once(title_case(language))
            .chain(frameworks.iter().cloned())
            .collect()
    });

    // Model-suggested dependencies are never trusted over detection
    let dependencies = detection
        .pom_dependencies
        .clone()
        .unwrap_or_else(|| frameworks.clone());

    ProjectOverview {
        project_name: draft
            .project_name
            .unwrap_or_else(|| detection.project_name.clone()),
        description: draft
            .description
            .unwrap_or_else(|| format!("{} project", title_case(language))),
        purpose: draft
            .purpose
            .unwrap_or_else(|| format!("Software project written in {}", language)),
        key_technologies,
        architecture_pattern: Some(
            draft
                .architecture_pattern
                .unwrap_or_else(|| "Unknown".to_string()),
        ),
        main_features: draft.main_features.unwrap_or_default(),
        dependencies,
    }
}

/// First README variant present at the root
fn read_readme(root: &Path) -> Option<String> {
    README_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .and_then(|path| read_non_empty(&path))
}

fn read_non_empty(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().filter(|c| !c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::narrative::testing::ScriptedNarrator;
    use crate::analyzer::Language;
    use crate::types::ProjectContext;
    use tempfile::TempDir;

    fn detection(root: &Path, pom: Option<Vec<&str>>) -> ProjectDetection {
        ProjectDetection {
            language: Language::Java,
            context: ProjectContext {
                frameworks: vec!["Spring Boot".to_string()],
                build_tools: vec!["Maven".to_string()],
                ..ProjectContext::new("java")
            },
            project_name: "rental-service".to_string(),
            pom_dependencies: pom.map(|d| d.into_iter().map(String::from).collect()),
            build_file: Some(root.join("pom.xml")),
        }
    }

    #[tokio::test]
    async fn test_fallbacks_when_narrative_is_absent() {
        let dir = TempDir::new().unwrap();
        let narrator = ScriptedNarrator::default();

        let overview = build_overview(dir.path(), &detection(dir.path(), None), &[], &narrator).await;

        assert_eq!(overview.project_name, "rental-service");
        assert_eq!(overview.description, "Java project");
        assert_eq!(overview.purpose, "Software project written in java");
        assert_eq!(overview.key_technologies, vec!["Java", "Spring Boot"]);
        assert_eq!(overview.architecture_pattern.as_deref(), Some("Unknown"));
        assert!(overview.main_features.is_empty());
        assert_eq!(overview.dependencies, vec!["Spring Boot"]);
        assert_eq!(narrator.calls("project_overview"), 1);
    }

    #[tokio::test]
    async fn test_draft_fields_win_except_dependencies() {
        let dir = TempDir::new().unwrap();
        let narrator = ScriptedNarrator::default().with_overview(OverviewDraft {
            description: Some("Car rental backend".to_string()),
            architecture_pattern: Some("Layered MVC".to_string()),
            main_features: Some(vec!["Bookings".to_string()]),
            dependencies: Some(vec!["made-up-lib".to_string()]),
            ..Default::default()
        });

        let overview = build_overview(
            dir.path(),
            &detection(dir.path(), Some(vec!["spring-boot-starter-web", "lombok"])),
            &[],
            &narrator,
        )
        .await;

        assert_eq!(overview.project_name, "rental-service");
        assert_eq!(overview.description, "Car rental backend");
        assert_eq!(overview.architecture_pattern.as_deref(), Some("Layered MVC"));
        assert_eq!(overview.main_features, vec!["Bookings"]);
        assert_eq!(overview.dependencies, vec!["spring-boot-starter-web", "lombok"]);
    }

    #[tokio::test]
    async fn test_empty_pom_dependencies_are_kept_empty() {
        let dir = TempDir::new().unwrap();
        let overview = build_overview(
            dir.path(),
            &detection(dir.path(), Some(vec![])),
            &[],
            &ScriptedNarrator::default(),
        )
        .await;
        assert!(overview.dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_readme_build_file_and_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "lower-case readme").unwrap();
        fs::write(dir.path().join("README.txt"), "text readme").unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

        let narrator = ScriptedNarrator::default();
        let paths = vec!["src/App.java".to_string()];
        build_overview(dir.path(), &detection(dir.path(), None), &paths, &narrator).await;

        let requests = narrator.overview_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.build_file.as_deref(), Some("<project/>"));
        assert_eq!(request.file_structure, paths);
        assert_eq!(request.language, "java");
        assert_eq!(request.frameworks, vec!["Spring Boot"]);
        assert!(request.readme.is_some());
    }

    #[tokio::test]
    async fn test_missing_files_are_absent_in_request() {
        let dir = TempDir::new().unwrap();
        let narrator = ScriptedNarrator::default();
        build_overview(dir.path(), &detection(dir.path(), None), &[], &narrator).await;

        let request = &narrator.overview_requests()[0];
        assert_eq!(request.readme, None);
        assert_eq!(request.build_file, None);
    }
}
