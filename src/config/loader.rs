//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/codebrief/config.toml)
//! 3. Project config (.codebrief/config.toml)
//! 4. Environment variables (CODEBRIEF_* prefix)
//!
//! An explicit `--config` file replaces layers 2 and 3.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{CodebriefError, Result};

const APP_DIR: &str = "codebrief";
const PROJECT_DIR: &str = ".codebrief";
const ENV_PREFIX: &str = "CODEBRIEF_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars, or
    /// defaults → explicit file → env vars when a file is given
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let files = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(CodebriefError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                vec![path.to_path_buf()]
            }
            None => Self::global_config_path()
                .into_iter()
                .chain(std::iter::once(Self::project_config_path()))
                .collect(),
        };

        Self::load_layers(&files)
    }

    /// Merge existing files in order on top of defaults, then env vars
    pub fn load_layers(files: &[PathBuf]) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in files.iter().filter(|p| p.exists()) {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // CODEBRIEF_LLM_TIMEOUT_SECS -> llm.timeout_secs (only the first `_` nests)
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replacen('_', ".", 1).into()),
        );

        let config: Config = figment
            .extract()
            .map_err(|e| CodebriefError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CodebriefError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/codebrief/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join(APP_DIR))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_DIR).join("config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| CodebriefError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a commented default config into `.codebrief/` under `root`
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let config_path = root.join(Self::project_config_path());

        if config_path.exists() && !force {
            return Err(CodebriefError::Config(format!(
                "Config already exists: {} (use --force to overwrite)",
                config_path.display()
            )));
        }

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&config_path, Self::default_project_config())?;
        info!("Created project config: {}", config_path.display());

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn default_project_config() -> String {
        r#"# codebrief project configuration
# Overrides ~/.config/codebrief/config.toml; CODEBRIEF_* env vars override both.

[analysis]
path = "."
output = "./output/analysis_results.json"
# "auto" or one of: java, python, javascript, go, ruby, csharp, php, cpp, c, rust, swift, kotlin, scala
target_language = "auto"
include = []
# exclude = ["**/target/**", "**/node_modules/**"]

[llm]
enabled = true
# openai | anthropic | ollama
provider = "openai"
# model = "gpt-4o-mini"
timeout_secs = 120
temperature = 0.1
max_tokens = 4000

[pipeline]
high_complexity_threshold = 10.0
interpret_complexity = true
describe_methods = true
"#
        .to_string()
    }
}
