//! Parsed source records
//!
//! Output of the source parsers and the only input the analysis pipeline
//! consumes. A file owns its classes, a class owns its methods.

use serde::{Deserialize, Serialize};

/// A single method or function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMethod {
    pub name: String,
    /// Full signature, e.g. `Order createOrder(OrderRequest request)`
    pub signature: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub return_type: Option<String>,
    /// Cyclomatic complexity, absent for bodiless declarations
    #[serde(default)]
    pub complexity: Option<f64>,
    #[serde(default)]
    pub annotations: Vec<String>,
    pub is_business_logic: bool,
    #[serde(default)]
    pub parameter_count: usize,
}

impl ParsedMethod {
    pub fn new(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            description: None,
            return_type: None,
            complexity: None,
            annotations: Vec::new(),
            is_business_logic: false,
            parameter_count: 0,
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn business(mut self, is_business_logic: bool) -> Self {
        self.is_business_logic = is_business_logic;
        self
    }
}

/// A class declaration with its direct methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedClass {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub methods: Vec<ParsedMethod>,
}

impl ParsedClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_method(mut self, method: ParsedMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    pub fn business_methods(&self) -> impl Iterator<Item = &ParsedMethod> {
        self.methods.iter().filter(|m| m.is_business_logic)
    }
}

/// One analyzed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    /// Path relative to the analyzed root
    pub path: String,
    /// Language tag, e.g. `java`, `python`
    pub file_type: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ParsedClass>,
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    /// Mean method complexity; absent when nothing was measured
    #[serde(default)]
    pub complexity: Option<f64>,
}

impl ParsedFile {
    pub fn new(path: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_type: file_type.into(),
            package: None,
            imports: Vec::new(),
            classes: Vec::new(),
            total_lines: 0,
            code_lines: 0,
            comment_lines: 0,
            complexity: None,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_class(mut self, class: ParsedClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_lines(mut self, total: usize, code: usize) -> Self {
        self.total_lines = total;
        self.code_lines = code;
        self.comment_lines = total.saturating_sub(code);
        self
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = Some(complexity);
        self
    }
}
