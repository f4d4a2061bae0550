//! Concurrent file writer for the static build output.
//!
//! All files of a batch are written at once with no ordering between
//! them. The first failure fails the whole batch; files already written
//! are left in place.

use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error};

/// Output files keyed by `/`-separated path relative to the output root.
pub type OutputMap = BTreeMap<String, String>;

/// A failed write. Fatal for the build.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve a `/`-separated output path below `root`.
///
/// Empty, `.` and `..` segments are dropped so the result never leaves `root`.
pub fn output_path(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in relative
        .split('/')
        .filter(|p| !p.is_empty() && *p != "." && *p != "..")
    {
        path.push(part);
    }
    path
}

/// Write every entry of `to_output` below `root`, creating directories as
/// needed. Returns the number of files written.
pub async fn write_files(
    to_output: &OutputMap,
    root: &Path,
    show_progress: bool,
) -> Result<usize, WriteError> {
    let progress = if show_progress {
        let pb = ProgressBar::new(to_output.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let writes = to_output.iter().map(|(relative, content)| {
        let full_path = output_path(root, relative);
        let progress = progress.clone();
        async move {
            write_one(&full_path, content).await?;
            progress.inc(1);
            progress.set_message(relative.clone());
            Ok::<(), WriteError>(())
        }
    });

    let result = try_join_all(writes).await;
    progress.finish_and_clear();

    let written = result?.len();
    debug!("Wrote {} files to {}", written, root.display());
    Ok(written)
}

async fn write_one(full_path: &Path, content: &str) -> Result<(), WriteError> {
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    fs::write(full_path, content.as_bytes()).await.map_err(|source| {
        error!("Failed to write {}", full_path.display());
        WriteError::Write {
            path: full_path.to_path_buf(),
            source,
        }
    })
}
