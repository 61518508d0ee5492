//! Error types for simulation setup.

use thiserror::Error;

/// Result type for simulation setup operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while building simulation objects.
///
/// After setup succeeds the tick itself is infallible: every runtime edge
/// case degrades to a documented fallback instead of an error.
#[derive(Debug, Error)]
pub enum SimError {
    /// The mesh file could not be loaded.
    #[error("mesh load failed: {0}")]
    MeshLoad(#[from] field_io::IoError),

    /// The distance field could not be built.
    #[error("distance field build failed: {0}")]
    DistanceField(#[from] field_sdf::SdfError),
}
