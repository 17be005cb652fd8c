//! Errors raised while packaging a single catalog entry

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::icons::IconError;
use crate::io::fetch::FetchError;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("icon processing failed: {0}")]
    Icon(#[from] IconError),

    #[error("filesystem error at {}: {}", .path.display(), .source)]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_yaml_ng::Error),
}

impl PackageError {
    /// Attach the offending path to an IO error.
    pub fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}
