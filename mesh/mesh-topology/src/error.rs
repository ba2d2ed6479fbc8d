//! Error types for topology operations.

use mesh_normals::NormalsError;
use mesh_types::MeshError;
use thiserror::Error;

/// Errors that can occur during topology operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The input mesh is malformed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Quadrangulation needs an all-triangle mesh.
    #[error("mesh is not triangulated: face {face} has {len} vertices")]
    NotTriangulated {
        /// First offending face.
        face: usize,
        /// Its vertex count.
        len: usize,
    },

    /// Triangles could not all be paired into quads.
    #[error("could not fully quadrangulate: paired {paired} of {triangles} triangles")]
    IncompletePairing {
        /// Triangles that found a partner.
        paired: usize,
        /// Triangles in the input.
        triangles: usize,
    },

    /// Normal computation failed.
    #[error(transparent)]
    Normals(#[from] NormalsError),
}

impl TopologyError {
    /// Whether the caller's input was malformed.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        match self {
            Self::Mesh(_) => true,
            Self::Normals(e) => e.is_input_error(),
            _ => false,
        }
    }

    /// Whether a precondition of the operator was not met.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        match self {
            Self::NotTriangulated { .. } | Self::IncompletePairing { .. } => true,
            Self::Normals(e) => e.is_precondition(),
            Self::Mesh(_) => false,
        }
    }
}

/// Result type for topology operations.
pub type TopologyResult<T> = std::result::Result<T, TopologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TopologyError::IncompletePairing {
            paired: 2,
            triangles: 3,
        };
        assert_eq!(
            err.to_string(),
            "could not fully quadrangulate: paired 2 of 3 triangles"
        );
        assert!(err.is_precondition());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_mesh_error_is_input() {
        let err = TopologyError::from(MeshError::EmptyMesh);
        assert!(err.is_input_error());
        assert!(!err.is_precondition());
    }
}
