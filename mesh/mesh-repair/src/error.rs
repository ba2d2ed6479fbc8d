//! Error types for mesh repair operations.

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during analysis and repair.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The input mesh is malformed or empty.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Component cleanup would discard every face.
    #[error(
        "no connected component has at least {min_face_count} faces (largest has {largest})"
    )]
    NoComponentsRemain {
        /// The requested minimum component size.
        min_face_count: usize,
        /// Face count of the largest component found.
        largest: usize,
    },

    /// Hole filling failed.
    #[error("failed to fill holes: {reason}")]
    HoleFillFailed {
        /// Reason for failure.
        reason: String,
    },

    /// A repair backend could not produce a mesh.
    #[error("repairer '{repairer}' failed: {reason}")]
    RepairerFailed {
        /// Name of the repair backend.
        repairer: String,
        /// Reason for failure.
        reason: String,
    },
}

impl RepairError {
    /// Whether the caller's input was malformed (as opposed to valid input
    /// that an operator could not process).
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Mesh(_))
    }

    /// Whether a geometric precondition of the operator was not met.
    ///
    /// The caller's mesh is intact and the failure is recoverable.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::NoComponentsRemain { .. })
    }
}
