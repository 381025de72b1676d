//! Configuration management for the AspScript language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Language definition override discovery

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the AspScript language server
#[derive(Debug, Parser)]
#[command(name = "aspscript-language-server")]
#[command(about = "Language server for AspScript component files")]
#[command(version)]
pub struct Args {
    /// Language definition TOML overriding the embedded one
    #[arg(long, help = "Path to a language definition TOML file")]
    pub language_file: Option<PathBuf>,

    /// Disable lint diagnostics (hover, completion and symbols stay active)
    #[arg(long, help = "Do not publish lint diagnostics")]
    pub no_lint: bool,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Language definition file explicitly set or found in the config dir
    pub language_file: Option<PathBuf>,
    /// Whether diagnostics are published on open/change
    pub lint_enabled: bool,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        // An explicit --language-file wins over the config-dir override
        let language_file = args.language_file.or_else(default_language_file);

        Ok(Config {
            language_file,
            lint_enabled: !args.no_lint,
            log_level: args.log_level,
        })
    }
}

/// User override in the config directory, if one exists:
/// `<config dir>/aspscript-ls/aspscript.lang.toml`
fn default_language_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?
        .join("aspscript-ls")
        .join("aspscript.lang.toml");
    path.exists().then_some(path)
}
