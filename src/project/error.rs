use std::path::PathBuf;

use crate::storage::StorageError;

/// Errors raised while saving or loading the storages of a project
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Storage archive error
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The storage file of a dataset does not exist
    #[error("Storage file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The dataset worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}
