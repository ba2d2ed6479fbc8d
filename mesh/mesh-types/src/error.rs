//! Input errors shared by every mesh operator.

use thiserror::Error;

/// Result type for mesh validation.
pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh buffer that cannot be operated on.
///
/// These are *input errors*: the caller handed over a malformed or empty
/// mesh. Operator crates wrap this type so callers can tell input errors
/// apart from precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// Mesh has no faces (or no vertices).
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references fewer than three vertex slots.
    #[error("face {face} has {len} vertex indices (need at least 3)")]
    FaceTooSmall {
        /// Index of the offending face.
        face: usize,
        /// Number of indices in the face.
        len: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex position contains NaN or infinity.
    #[error("vertex {vertex} has a non-finite position")]
    NonFinitePosition {
        /// Index of the offending vertex.
        vertex: usize,
    },
}
