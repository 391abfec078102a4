//! Config Command
//!
//! Usage:
//!   codebrief config show [-f toml|json]
//!   codebrief config path
//!   codebrief config init [--force]

use std::path::Path;

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{CodebriefError, Result};

/// Print the merged effective configuration
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" => false,
        other => {
            return Err(CodebriefError::InvalidInput(format!(
                "Unknown format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    let config = ConfigLoader::load(config_path)?;
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write `.codebrief/config.toml` in the current directory
pub fn init(force: bool, out: &Output) -> Result<()> {
    let root = std::env::current_dir()?;
    let path = ConfigLoader::init_project(&root, force)?;
    out.success("Initialized project configuration");
    out.info(&format!("Config: {}", path.display()));
    Ok(())
}
