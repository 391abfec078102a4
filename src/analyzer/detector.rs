//! Project Detector
//!
//! Determines the primary language, frameworks, build tooling and project
//! name from build files and source extensions. Only files at the root are
//! read for framework and name detection; language indicators are searched
//! recursively.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use regex::Regex;
use tracing::debug;

use super::parser::Language;
use crate::constants::analysis::DETECTION_SKIP_DIRS;
use crate::constants::overview::MAX_DEPENDENCIES;
use crate::types::{CodebriefError, ProjectContext, Result};

/// Build files that decide the language outright, in priority order
const LANGUAGE_INDICATORS: &[(&str, Language)] = &[
    ("pom.xml", Language::Java),
    ("build.gradle", Language::Java),
    ("package.json", Language::JavaScript),
    ("requirements.txt", Language::Python),
    ("setup.py", Language::Python),
    ("pyproject.toml", Language::Python),
    ("go.mod", Language::Go),
    ("Gemfile", Language::Ruby),
    ("composer.json", Language::Php),
    ("Cargo.toml", Language::Rust),
];

/// Build file handed to the overview, per language, first existing wins
const BUILD_FILES: &[(Language, &[&str])] = &[
    (Language::Java, &["pom.xml", "build.gradle"]),
    (Language::Python, &["requirements.txt", "pyproject.toml", "setup.py"]),
    (Language::JavaScript, &["package.json"]),
    (Language::Go, &["go.mod"]),
    (Language::Ruby, &["Gemfile"]),
    (Language::Php, &["composer.json"]),
    (Language::Rust, &["Cargo.toml"]),
];

/// Everything the detector learned about a project
#[derive(Debug, Clone)]
pub struct ProjectDetection {
    pub language: Language,
    pub context: ProjectContext,
    pub project_name: String,
    /// Distinct pom.xml artifactIds; `Some` whenever a readable pom.xml exists for a Java project
    pub pom_dependencies: Option<Vec<String>>,
    pub build_file: Option<PathBuf>,
}

pub struct ProjectDetector {
    root: PathBuf,
}

impl ProjectDetector {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Run every detection. `target_language` overrides language detection.
    pub fn detect(&self, target_language: Option<Language>) -> Result<ProjectDetection> {
        if !self.root.is_dir() {
            return Err(CodebriefError::InvalidInput(format!(
                "Codebase path does not exist: {}",
                self.root.display()
            )));
        }

        let language = match target_language {
            Some(lang) => lang,
            None => self.detect_language(),
        };
        debug!("Project language: {}", language);

        let mut context = self.detect_context();
        context.language = language.tag().to_string();

        let pom_dependencies = if language == Language::Java {
            self.pom_dependencies()
        } else {
            None
        };

        Ok(ProjectDetection {
            language,
            context,
            project_name: self.project_name(),
            pom_dependencies,
            build_file: self.build_file(language),
        })
    }

    /// Indicator build file first, then the most frequent source extension
    pub fn detect_language(&self) -> Language {
        let survey = self.survey();

        if let Some((_, lang)) = LANGUAGE_INDICATORS
            .iter()
            .find(|(name, _)| survey.file_names.contains(*name))
        {
            return *lang;
        }

        // Ties resolve to the earlier entry of the language table
        let mut best: Option<(Language, usize)> = None;
        for lang in Language::KNOWN {
            let count = survey.counts.get(&lang).copied().unwrap_or(0);
            if count > 0 && best.is_none_or(|(_, c)| count > c) {
                best = Some((lang, count));
            }
        }

        best.map(|(lang, _)| lang).unwrap_or(Language::Unknown)
    }

    /// Frameworks, build tools and package manager from root build files
    pub fn detect_context(&self) -> ProjectContext {
        let mut context = ProjectContext::default();

        if let Some(pom) = self.read_root("pom.xml") {
            context.build_tools.push("Maven".to_string());
            if pom.to_lowercase().contains("spring-boot") {
                context.frameworks.push("Spring Boot".to_string());
            }
        }

        if self.root.join("build.gradle").exists() {
            context.build_tools.push("Gradle".to_string());
        }

        if let Some(package) = self.read_root("package.json") {
            context.package_manager = Some("npm/yarn".to_string());
            push_mentioned(
                &mut context.frameworks,
                &package,
                &[
                    ("react", "React"),
                    ("vue", "Vue"),
                    ("angular", "Angular"),
                    ("express", "Express"),
                    ("next", "Next.js"),
                ],
            );
        }

        if let Some(requirements) = self.read_root("requirements.txt") {
            context.package_manager = Some("pip".to_string());
            push_mentioned(
                &mut context.frameworks,
                &requirements,
                &[("django", "Django"), ("flask", "Flask"), ("fastapi", "FastAPI")],
            );
        }

        if self.root.join("go.mod").exists() {
            context.package_manager = Some("go modules".to_string());
        }

        if let Some(gemfile) = self.read_root("Gemfile") {
            context.package_manager = Some("Bundler".to_string());
            push_mentioned(&mut context.frameworks, &gemfile, &[("rails", "Ruby on Rails")]);
        }

        context
    }

    /// package.json name, pom.xml artifactId, setup.py name, else the directory name
    pub fn project_name(&self) -> String {
        if let Some(name) = self
            .read_root("package.json")
            .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok())
            .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(String::from))
        {
            return name;
        }

        if let Some(name) = self
            .read_root("pom.xml")
            .and_then(|c| first_capture(r"<artifactId>(.*?)</artifactId>", &c))
        {
            return name;
        }

        if let Some(name) = self
            .read_root("setup.py")
            .and_then(|c| first_capture(r#"name=["']([^"']+)["']"#, &c))
        {
            return name;
        }

        self.root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Distinct artifactIds of the root pom.xml in first-occurrence order
    pub fn pom_dependencies(&self) -> Option<Vec<String>> {
        let pom = self.read_root("pom.xml")?;
        let re = Regex::new(r"<artifactId>(.*?)</artifactId>").ok()?;

        let mut seen = HashSet::new();
        let deps = re
            .captures_iter(&pom)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .take(MAX_DEPENDENCIES)
            .collect();

        Some(deps)
    }

    /// First existing build file for the language at the root
    pub fn build_file(&self, language: Language) -> Option<PathBuf> {
        BUILD_FILES
            .iter()
            .find(|(lang, _)| *lang == language)
            .and_then(|(_, names)| {
                names
                    .iter()
                    .map(|name| self.root.join(name))
                    .find(|path| path.is_file())
            })
    }

    fn read_root(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.root.join(name)).ok()
    }

    /// One walk collecting file names and per-language source counts
    fn survey(&self) -> Survey {
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !(entry.file_type().is_some_and(|t| t.is_dir())
                    && entry.depth() > 0
                    && DETECTION_SKIP_DIRS.contains(&name.as_ref()))
            })
            .build();

        let mut survey = Survey::default();
        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            survey
                .file_names
                .insert(entry.file_name().to_string_lossy().into_owned());

            let lang = Language::from_path(entry.path());
            if lang.is_known() {
                *survey.counts.entry(lang).or_insert(0) += 1;
            }
        }
        survey
    }
}

#[derive(Default)]
struct Survey {
    file_names: HashSet<String>,
    counts: HashMap<Language, usize>,
}

fn push_mentioned(frameworks: &mut Vec<String>, content: &str, table: &[(&str, &str)]) {
    let lower = content.to_lowercase();
    for (needle, framework) in table {
        if lower.contains(needle) {
            frameworks.push(framework.to_string());
        }
    }
}

fn first_capture(pattern: &str, content: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(content)?
        .get(1)
        .map(|m| m.as_str().to_string())
}
