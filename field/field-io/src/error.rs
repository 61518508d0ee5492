//! Error types for mesh I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading a mesh.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// A face referenced a vertex that does not exist.
    #[error("face index {index} out of range on line {line} ({vertex_count} vertices loaded)")]
    FaceIndexOutOfRange {
        /// The offending 1-based OBJ index.
        index: i64,
        /// 1-based line number in the file.
        line: usize,
        /// Number of vertices seen so far.
        vertex_count: usize,
    },

    /// A face line could not be parsed at all.
    #[error("malformed face on line {line}: {message}")]
    MalformedFace {
        /// 1-based line number in the file.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
