//! Report types
//!
//! Fixed-shape records produced by the pipeline stages and assembled into
//! [`CodebaseAnalysis`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ProjectOverview;
use crate::constants::report::NO_COMPLEXITY_MESSAGE;

// =============================================================================
// Component Roles
// =============================================================================

/// Architectural role assigned to a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentRole {
    Controllers,
    Services,
    Repositories,
    Entities,
    Configurations,
}

impl ComponentRole {
    /// All roles in classification order
    pub const ALL: [ComponentRole; 5] = [
        ComponentRole::Controllers,
        ComponentRole::Services,
        ComponentRole::Repositories,
        ComponentRole::Entities,
        ComponentRole::Configurations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentRole::Controllers => "controllers",
            ComponentRole::Services => "services",
            ComponentRole::Repositories => "repositories",
            ComponentRole::Entities => "entities",
            ComponentRole::Configurations => "configurations",
        }
    }

    /// Roles whose business methods are reported as key methods
    pub fn exposes_key_methods(&self) -> bool {
        matches!(self, ComponentRole::Controllers | ComponentRole::Services)
    }
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role -> ordered class names. Every role is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMap {
    #[serde(default)]
    pub controllers: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub configurations: Vec<String>,
}

impl ComponentMap {
    pub fn get(&self, role: ComponentRole) -> &[String] {
        match role {
            ComponentRole::Controllers => &self.controllers,
            ComponentRole::Services => &self.services,
            ComponentRole::Repositories => &self.repositories,
            ComponentRole::Entities => &self.entities,
            ComponentRole::Configurations => &self.configurations,
        }
    }

    pub fn push(&mut self, role: ComponentRole, class_name: impl Into<String>) {
        let bucket = match role {
            ComponentRole::Controllers => &mut self.controllers,
            ComponentRole::Services => &mut self.services,
            ComponentRole::Repositories => &mut self.repositories,
            ComponentRole::Entities => &mut self.entities,
            ComponentRole::Configurations => &mut self.configurations,
        };
        bucket.push(class_name.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentRole, &[String])> {
        ComponentRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    pub fn count(&self, role: ComponentRole) -> usize {
        self.get(role).len()
    }

    pub fn total(&self) -> usize {
        self.iter().map(|(_, names)| names.len()).sum()
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Corpus-wide counts. Averages are floored and 0 on an empty divisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_code_lines: usize,
    pub total_classes: usize,
    /// Business-logic methods only
    pub total_methods: usize,
    pub file_types: BTreeMap<String, usize>,
    pub average_file_size: usize,
    pub average_methods_per_class: usize,
}

// =============================================================================
// Complexity
// =============================================================================

/// Numeric complexity figures over files that carry a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    #[serde(rename = "average_complexity")]
    pub average: f64,
    #[serde(rename = "max_complexity")]
    pub max: f64,
    #[serde(rename = "min_complexity")]
    pub min: f64,
    pub high_complexity_files: Vec<String>,
}

/// Complexity section of the report.
///
/// `NoData` is a distinct state and serializes as a lone `message` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComplexitySummary {
    Measured {
        #[serde(flatten)]
        metrics: ComplexityMetrics,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interpretation: Option<String>,
    },
    NoData {
        message: String,
    },
}

impl ComplexitySummary {
    pub fn no_data() -> Self {
        ComplexitySummary::NoData {
            message: NO_COMPLEXITY_MESSAGE.to_string(),
        }
    }

    pub fn metrics(&self) -> Option<&ComplexityMetrics> {
        match self {
            ComplexitySummary::Measured { metrics, .. } => Some(metrics),
            ComplexitySummary::NoData { .. } => None,
        }
    }

    pub fn interpretation(&self) -> Option<&str> {
        match self {
            ComplexitySummary::Measured { interpretation, .. } => interpretation.as_deref(),
            ComplexitySummary::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ComplexitySummary::NoData { .. })
    }
}

// =============================================================================
// Key Methods & Final Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMethodSummary {
    pub class_name: String,
    pub method_name: String,
    pub signature: String,
    pub description: Option<String>,
    pub annotations: Vec<String>,
    pub component_type: Option<ComponentRole>,
}

/// The complete report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodebaseAnalysis {
    pub overview: ProjectOverview,
    pub statistics: StatisticsSummary,
    pub key_methods: Vec<KeyMethodSummary>,
    pub key_components: ComponentMap,
    pub complexity_summary: ComplexitySummary,
    pub recommendations: Vec<String>,
    pub noteworthy_aspects: Vec<String>,
}
