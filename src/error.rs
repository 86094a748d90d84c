use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced by the store. All are fatal to the current
/// operation; none are retried or downgraded to warnings.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("integrity check failed for {subject}: expected sha256 {expected}, got {actual}")]
    Integrity {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),
}

impl StoreError {
    /// Map an open/stat error on `path`, keeping missing-file errors
    /// distinct from other IO failures.
    pub fn from_io(err: io::Error, path: &std::path::Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(path.to_path_buf())
        } else {
            StoreError::Io(err)
        }
    }
}
