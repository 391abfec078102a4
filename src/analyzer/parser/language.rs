//! Language Table
//!
//! Single source of truth for language tags, source extensions and comment
//! prefixes. Detection, scanning and parsing all go through [`Language`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table
// =============================================================================

struct LanguageMeta {
    /// Lower-case tag used in reports and configuration
    tag: &'static str,
    /// Source extensions (without the dot)
    extensions: &'static [&'static str],
    aliases: &'static [&'static str],
    /// Prefix of a single-line comment
    comment_prefix: &'static str,
    /// Whether a structural parser exists
    has_parser: bool,
}

macro_rules! lang_meta {
    ($tag:literal, [$($ext:literal),*], [$($alias:literal),*], $comment:literal, $parser:literal) => {
        LanguageMeta {
            tag: $tag,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            comment_prefix: $comment,
            has_parser: $parser,
        }
    };
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Java => lang_meta!("java", ["java"], [], "//", true),
            Language::Python => lang_meta!("python", ["py"], ["py"], "#", false),
            Language::JavaScript => {
                lang_meta!("javascript", ["js", "jsx", "ts", "tsx"], ["js", "typescript", "ts"], "//", false)
            }
            Language::Go => lang_meta!("go", ["go"], ["golang"], "//", false),
            Language::Ruby => lang_meta!("ruby", ["rb"], ["rb"], "#", false),
            Language::CSharp => lang_meta!("csharp", ["cs"], ["c#", "cs"], "//", false),
            Language::Php => lang_meta!("php", ["php"], [], "//", false),
            Language::Cpp => lang_meta!("cpp", ["cpp", "hpp"], ["c++"], "//", false),
            Language::C => lang_meta!("c", ["c", "h"], [], "//", false),
            Language::Rust => lang_meta!("rust", ["rs"], ["rs"], "//", false),
            Language::Swift => lang_meta!("swift", ["swift"], [], "//", false),
            Language::Kotlin => lang_meta!("kotlin", ["kt"], ["kt"], "//", false),
            Language::Scala => lang_meta!("scala", ["scala"], [], "//", false),
            Language::Unknown => lang_meta!("unknown", [], [""], "//", false),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages the analyzer recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    JavaScript,
    Go,
    Ruby,
    CSharp,
    Php,
    Cpp,
    C,
    Rust,
    Swift,
    Kotlin,
    Scala,
    #[default]
    Unknown,
}

impl Language {
    /// Known languages in detection tie-break order
    pub const KNOWN: [Language; 13] = [
        Language::Java,
        Language::Python,
        Language::JavaScript,
        Language::Go,
        Language::Ruby,
        Language::CSharp,
        Language::Php,
        Language::Cpp,
        Language::C,
        Language::Rust,
        Language::Swift,
        Language::Kotlin,
        Language::Scala,
    ];

    pub fn tag(&self) -> &'static str {
        self.meta().tag
    }

    /// Source extensions scanned for this language. Empty for `Unknown`.
    pub fn extensions(&self) -> &'static [&'static str] {
        self.meta().extensions
    }

    pub fn comment_prefix(&self) -> &'static str {
        self.meta().comment_prefix
    }

    pub fn has_parser_support(&self) -> bool {
        self.meta().has_parser
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        Self::KNOWN
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        if lower == "unknown" || lower.is_empty() {
            return Ok(Language::Unknown);
        }

        Self::KNOWN
            .into_iter()
            .find(|lang| lang.tag() == lower || lang.meta().aliases.contains(&lower.as_str()))
            .ok_or(())
    }
}
