//! Error types for distance-field construction.

use thiserror::Error;

/// Result type for distance-field operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur while building a signed distance grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SdfError {
    /// The mesh has no usable (non-degenerate) triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// The grid resolution is below the minimum of 2 samples per axis.
    #[error("invalid grid resolution {0}: must be at least 2")]
    InvalidResolution(usize),
}
