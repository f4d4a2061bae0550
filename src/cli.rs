//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// tooling-report - build helper for the build-tool compatibility matrix
///
/// Loads the test definitions, scores every configured tool and writes
/// the static report pages.
///
/// Examples:
///   tooling-report
///   tooling-report --tests ./tests --output-dir ./public
///   tooling-report --tools rollup,webpack --format json
///   tooling-report --dry-run
///   tooling-report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding the test definition files
    ///
    /// Every *.json or *.toml file below it is one root test.
    #[arg(short, long, value_name = "DIR", env = "TOOLING_REPORT_TESTS")]
    pub tests: Option<PathBuf>,

    /// Directory the static output is written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .tooling-report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tools to score, in order (comma-separated)
    ///
    /// Overrides `test_subjects` from the config file. Example: --tools rollup,webpack
    #[arg(long, value_name = "TOOLS", value_delimiter = ',')]
    pub tools: Option<Vec<String>>,

    /// Branch used for links to the test sources
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Output format (html, json, all)
    #[arg(long, default_value = "all", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and score the tests without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .tooling-report.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Which report files to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// index.html only
    Html,
    /// scores.json only
    Json,
    /// Both (default)
    #[default]
    All,
}

impl OutputFormat {
    pub fn includes_html(&self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::All)
    }

    pub fn includes_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref tools) = self.tools {
            if tools.iter().any(|t| t.trim().is_empty()) {
                return Err("Tool names must not be empty".to_string());
            }
        }

        if let Some(ref tests) = self.tests {
            if !tests.is_dir() {
                return Err(format!("Tests directory does not exist: {}", tests.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
