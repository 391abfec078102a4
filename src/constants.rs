//! Global Constants
//!
//! Centralized constants for thresholds and limits.
//! All magic numbers should be defined here with documentation.

/// Complexity aggregation constants
pub mod complexity {
    /// Files whose aggregate complexity exceeds this are flagged
    pub const HIGH_COMPLEXITY_THRESHOLD: f64 = 10.0;
}

/// Rule-based aspect thresholds
pub mod aspects {
    /// Narrative lines shorter than this are discarded as noise
    pub const MIN_ASPECT_LEN: usize = 20;

    /// Class names sampled per role in the narrative context
    pub const KEY_CLASS_SAMPLE: usize = 5;

    /// Average complexity below this is reported as maintainable
    pub const LOW_AVG_COMPLEXITY: f64 = 2.0;

    /// Average complexity above this is reported as a refactoring candidate
    pub const HIGH_AVG_COMPLEXITY: f64 = 5.0;

    /// Codebases below this many lines are "compact"
    pub const COMPACT_LINES: usize = 3000;

    /// Codebases above this many lines are "large"
    pub const LARGE_LINES: usize = 10_000;

    /// Average business methods per class below this hints at single responsibility
    pub const FEW_METHODS_PER_CLASS: f64 = 3.0;

    /// Configuration class that indicates Spring Security
    pub const SECURITY_CONFIG_CLASS: &str = "WebSecurityConfig";
}

/// Overview builder limits
pub mod overview {
    /// README candidates, in lookup order
    pub const README_NAMES: &[&str] = &["README.md", "readme.md", "README.rst", "README.txt", "README"];

    /// Characters of README passed to the narrative service
    pub const README_CHARS: usize = 3000;

    /// Characters of the build file passed to the narrative service
    pub const BUILD_FILE_CHARS: usize = 2000;

    /// Relative source paths passed as the file-structure sample
    pub const MAX_STRUCTURE_FILES: usize = 50;

    /// Dependencies kept from pom.xml
    pub const MAX_DEPENDENCIES: usize = 20;
}

/// File analysis constants
pub mod analysis {
    /// Maximum file size to analyze (1MB)
    pub const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Directories never considered during language detection
    pub const DETECTION_SKIP_DIRS: &[&str] = &[
        "node_modules",
        "venv",
        "env",
        "target",
        "build",
        "dist",
        ".git",
        "__pycache__",
        "vendor",
    ];
}

/// LLM request defaults
pub mod llm {
    pub const DEFAULT_PROVIDER: &str = "openai";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
    pub const DEFAULT_TEMPERATURE: f32 = 0.1;
    pub const DEFAULT_MAX_TOKENS: usize = 4000;

    /// Providers accepted by `create_provider`
    pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "anthropic", "ollama"];
}

/// Report output constants
pub mod report {
    /// Marker used when no file carries a complexity score
    pub const NO_COMPLEXITY_MESSAGE: &str = "No complexity data available";

    /// Default report location
    pub const DEFAULT_OUTPUT_PATH: &str = "./output/analysis_results.json";
}
