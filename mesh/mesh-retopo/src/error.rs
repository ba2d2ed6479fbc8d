//! Error types for retopology operations.

use mesh_normals::NormalsError;
use mesh_types::MeshError;
use thiserror::Error;

/// Errors that can occur during decimation and remeshing.
#[derive(Debug, Error)]
pub enum RetopoError {
    /// The input mesh is malformed or empty.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Reduction factor outside `(0, 1]`.
    #[error("Invalid reduction factor: {0} (must be in (0, 1])")]
    InvalidFactor(f64),

    /// Target edge length is not a positive number.
    #[error("Invalid target edge length: {0}")]
    InvalidEdgeLength(f64),

    /// A decimation or remeshing backend failed.
    #[error("{backend} failed: {reason}")]
    Backend {
        /// Backend name.
        backend: String,
        /// What went wrong.
        reason: String,
    },

    /// A backend returned buffers that do not form a valid mesh.
    #[error("{backend} returned an invalid mesh: {source}")]
    InvalidOutput {
        /// Backend name.
        backend: String,
        /// The validation failure.
        source: MeshError,
    },

    /// Smoothing the result failed.
    #[error(transparent)]
    Normals(#[from] NormalsError),
}

impl RetopoError {
    /// Create a backend failure.
    #[must_use]
    pub fn backend(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller's input was malformed.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Mesh(_))
    }

    /// Whether a precondition of the operator was not met.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidFactor(_) | Self::InvalidEdgeLength(_))
    }
}

/// Result type for retopology operations.
pub type RetopoResult<T> = std::result::Result<T, RetopoError>;
