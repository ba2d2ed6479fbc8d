//! Error types for mesh subdivision operations.

use mesh_types::MeshError;
use thiserror::Error;

/// Errors that can occur during subdivision operations.
#[derive(Debug, Error)]
pub enum SubdivideError {
    /// The input mesh is malformed or empty.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Invalid iteration count.
    #[error("Invalid iteration count: {0} (must be >= 1)")]
    InvalidIterations(u32),

    /// Midpoint subdivision needs triangles.
    #[error("Midpoint subdivision needs triangles: face {face} has {len} vertices")]
    NotTriangulated {
        /// First offending face.
        face: usize,
        /// Its vertex count.
        len: usize,
    },

    /// Mesh would exceed maximum size.
    #[error("Subdivision would exceed maximum mesh size ({current} -> {projected} faces, max {max})")]
    MeshTooLarge {
        /// Current face count.
        current: usize,
        /// Projected face count after subdivision.
        projected: usize,
        /// Maximum allowed face count.
        max: usize,
    },
}

impl SubdivideError {
    /// Whether the caller's input was malformed.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Mesh(_))
    }

    /// Whether a precondition of the operator was not met.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        !self.is_input_error()
    }
}

/// Result type for subdivision operations.
pub type SubdivideResult<T> = std::result::Result<T, SubdivideError>;
