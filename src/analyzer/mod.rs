//! Code Analyzer Module
//!
//! Everything that happens before the analysis pipeline:
//! - File scanning with gitignore support
//! - Project language and framework detection
//! - Source parsing into parsed-file records

pub mod detector;
pub mod parser;
pub mod scanner;

pub use detector::{ProjectDetection, ProjectDetector};
pub use parser::{JavaParser, Language, SourceParser};
pub use scanner::{FileScanner, ScannedFile};
