//! Error types for flatdo file store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during `FileStore` operations.
///
/// An absent task file is not an error: reads fail soft and yield an empty
/// collection instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The task file exists but could not be opened or read.
    #[error("failed to read task file {path}: {source}")]
    Read {
        /// Path of the task file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The task file could not be written. The previous on-disk content is
    /// left untouched because writes go through a temp file and rename.
    #[error("failed to write task file {path}: {source}")]
    Write {
        /// Path of the task file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
