use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::analysis::MAX_FILE_SIZE;
use crate::types::{CodebriefError, Result};

/// Directory walker producing the ordered list of files to analyze
pub struct FileScanner {
    root: PathBuf,
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
    extensions: Vec<String>,
    max_file_size: u64,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include: Vec::new(),
            exclude: Vec::new(),
            extensions: Vec::new(),
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Only keep files matching one of these globs (relative paths). Empty keeps all.
    pub fn with_include(mut self, patterns: &[String]) -> Result<Self> {
        self.include = compile(patterns)?;
        Ok(self)
    }

    /// Drop files matching any of these globs (relative paths)
    pub fn with_exclude(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude = compile(patterns)?;
        Ok(self)
    }

    /// Only keep these extensions (without the dot). Empty keeps all.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Walk the root. Results are sorted by relative path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(CodebriefError::InvalidInput(format!(
                "Codebase path is not a directory: {}",
                self.root.display()
            )));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .follow_links(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut files = Vec::new();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let Some(relative) = relative_path(&self.root, path) else {
                continue;
            };

            if !self.accepts(&relative, path) {
                continue;
            }

            let Ok(metadata) = path.metadata() else {
                continue;
            };
            if metadata.len() > self.max_file_size {
                debug!("Skipping {} ({} bytes)", relative, metadata.len());
                continue;
            }

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative,
                size: metadata.len(),
                extension: path.extension().and_then(|e| e.to_str()).map(String::from),
            });
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        debug!("Scanned {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn accepts(&self, relative: &str, path: &Path) -> bool {
        if self.exclude.iter().any(|p| p.matches(relative)) {
            return false;
        }

        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(relative)) {
            return false;
        }

        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative: String,
    pub size: u64,
    pub extension: Option<String>,
}

fn compile(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p)
                .map_err(|e| CodebriefError::Config(format!("Invalid glob pattern '{}': {}", p, e)))
        })
        .collect()
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
