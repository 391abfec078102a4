use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codebrief::cli::Output;
use codebrief::cli::commands::{analyze, config};

#[derive(Parser)]
#[command(name = "codebrief")]
#[command(
    version,
    about = "Architecture, complexity and key-method report for a codebase"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Use this config file instead of the global/project ones")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a codebase and write the JSON report
    Analyze {
        #[arg(long, short, help = "Codebase root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, short, help = "Language override (java, python, ...); auto-detected by default")]
        language: Option<String>,
        #[arg(long, help = "LLM provider (openai, anthropic, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(long, short, help = "Report file")]
        output: Option<PathBuf>,
        #[arg(long, help = "Skip the LLM entirely")]
        offline: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Create .codebrief/config.toml in the current directory
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcodebrief encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let out = if cli.quiet {
        Output::quiet()
    } else {
        Output::new()
    };
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            path,
            language,
            provider,
            model,
            output,
            offline,
        } => {
            analyze::run(
                config_path,
                analyze::AnalyzeOptions {
                    path,
                    language,
                    provider,
                    model,
                    output,
                    offline,
                },
                &out,
            )?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => config::show(config_path, &format)?,
            ConfigAction::Path => config::path()?,
            ConfigAction::Init { force } => config::init(force, &out)?,
        },
    }

    Ok(())
}
