//! Error types for normal operations.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for normal operations.
pub type NormalsResult<T> = Result<T, NormalsError>;

/// Errors that can occur while computing or transferring normals.
#[derive(Debug, Error)]
pub enum NormalsError {
    /// The input mesh is malformed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Angle threshold is not a number.
    #[error("invalid angle threshold: {degrees}")]
    InvalidAngle {
        /// The rejected threshold in degrees.
        degrees: f64,
    },

    /// Normal transfer needs at least one source vertex.
    #[error("source mesh has no vertices")]
    EmptySource,
}

impl NormalsError {
    /// Whether the caller's input was malformed.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Mesh(_))
    }

    /// Whether a precondition of the operator was not met.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidAngle { .. } | Self::EmptySource)
    }
}
