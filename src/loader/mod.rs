//! Test suite loading.
//!
//! Discovers test definition files below a directory and parses them
//! into the [`Tests`] tree. Each `*.json` or `*.toml` file is one root
//! test named after its file stem; nested subtests live inside the file
//! under `subTests`.

use crate::models::{Test, Tests};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Errors raised while loading the test suite.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Tests directory not found: {0}")]
    MissingRoot(PathBuf),

    #[error("Failed to walk tests directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Duplicate test name '{name}' ({path})")]
    Duplicate { name: String, path: PathBuf },
}

/// Supported test definition formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionFormat {
    Json,
    Toml,
}

impl DefinitionFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(DefinitionFormat::Json),
            Some("toml") => Some(DefinitionFormat::Toml),
            _ => None,
        }
    }
}

/// Loader for a directory of test definitions.
pub struct SuiteLoader {
    root: PathBuf,
}

impl SuiteLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every test definition below the root.
    ///
    /// Files are visited in sorted path order; hidden files and
    /// directories are skipped.
    pub fn load(&self) -> Result<Tests, LoadError> {
        if !self.root.is_dir() {
            return Err(LoadError::MissingRoot(self.root.clone()));
        }

        let mut tests = Tests::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(format) = DefinitionFormat::from_path(path) else {
                trace!("Skipping {}", path.display());
                continue;
            };
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("Skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };

            let test = parse_definition(path, format)?;
            debug!("Loaded test '{}' from {}", name, path.display());

            if tests.insert(name.to_string(), test).is_some() {
                return Err(LoadError::Duplicate {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(tests)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn parse_definition(path: &Path, format: DefinitionFormat) -> Result<Test, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        DefinitionFormat::Json => serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        DefinitionFormat::Toml => toml::from_str(&content).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Count every node (roots and subtests) in the suite.
pub fn count_nodes(tests: &Tests) -> usize {
    fn count(test: &Test) -> usize {
        1 + test.children().map(|(_, child)| count(child)).sum::<usize>()
    }

    tests.values().map(count).sum()
}
