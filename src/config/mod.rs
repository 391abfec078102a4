//! Configuration Management
//!
//! Hierarchical resolution, lowest priority first:
//! 1. Built-in defaults
//! 2. Global config (~/.config/codebrief/config.toml)
//! 3. Project config (.codebrief/config.toml)
//! 4. Environment variables (CODEBRIEF_*)
//! 5. CLI arguments

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
