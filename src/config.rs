//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.tooling-report.toml` files. The configuration is loaded once
//! before any scoring happens and passed explicitly from then on.

use crate::models::BuildTool;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".tooling-report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Source repository settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Tools under test.
    #[serde(default)]
    pub subjects: SubjectsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory the static output is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory holding the test definition files.
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            tests_dir: default_tests_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    [".tmp", "build", "static"].iter().collect()
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("tests")
}

/// Where the test sources live, used for "view source" links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Repository URL, including the trailing slash.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch used when no explicit ref is given.
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            default_branch: default_branch(),
        }
    }
}

fn default_repository() -> String {
    "https://github.com/GoogleChromeLabs/tooling.report/".to_string()
}

fn default_branch() -> String {
    "dev".to_string()
}

/// The ordered list of tools that are scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectsConfig {
    #[serde(default = "default_test_subjects")]
    pub test_subjects: Vec<BuildTool>,
}

impl Default for SubjectsConfig {
    fn default() -> Self {
        Self {
            test_subjects: default_test_subjects(),
        }
    }
}

fn default_test_subjects() -> Vec<BuildTool> {
    vec!["browserify", "parcel", "rollup", "webpack"]
        .into_iter()
        .map(BuildTool::from)
        .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref tests_dir) = args.tests {
            self.general.tests_dir = tests_dir.clone();
        }
        if let Some(ref output_dir) = args.output_dir {
            self.general.output_dir = output_dir.clone();
        }
        if let Some(ref tools) = args.tools {
            self.subjects.test_subjects = tools.iter().map(|t| BuildTool::new(t.trim())).collect();
        }
        if let Some(ref branch) = args.branch {
            self.github.default_branch = branch.clone();
        }
    }

    /// The tools to score, in configured order.
    pub fn tools(&self) -> &[BuildTool] {
        &self.subjects.test_subjects
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
