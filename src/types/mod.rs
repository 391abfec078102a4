pub mod error;
pub mod parsed;
pub mod project;
pub mod report;

pub use error::{CodebriefError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use parsed::{ParsedClass, ParsedFile, ParsedMethod};
pub use project::{ProjectContext, ProjectOverview};
pub(crate) use project::title_case;
pub use report::{
    CodebaseAnalysis, ComplexityMetrics, ComplexitySummary, ComponentMap, ComponentRole,
    KeyMethodSummary, StatisticsSummary,
};
