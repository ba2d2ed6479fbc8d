//! Result types for subdivision operations.

// Face counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::IndexedMesh;

use crate::params::SubdivisionMethod;

/// Result of mesh subdivision.
#[derive(Debug, Clone)]
pub struct SubdivisionResult {
    /// The subdivided mesh.
    pub mesh: IndexedMesh,

    /// Number of faces in original mesh.
    pub original_faces: usize,

    /// Number of faces in subdivided mesh.
    pub final_faces: usize,

    /// Number of vertices in original mesh.
    pub original_vertices: usize,

    /// Number of vertices in subdivided mesh.
    pub final_vertices: usize,

    /// Number of iterations performed.
    pub iterations: u32,

    /// Subdivision method used.
    pub method: SubdivisionMethod,

    /// Vertices left with a zero normal after recomputation.
    pub zero_length_normals: Vec<u32>,
}

impl SubdivisionResult {
    /// Get the face multiplication factor.
    #[must_use]
    pub fn face_ratio(&self) -> f64 {
        if self.original_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.original_faces as f64
        }
    }

    /// Number of vertices added across all iterations.
    #[must_use]
    pub const fn vertices_added(&self) -> usize {
        self.final_vertices.saturating_sub(self.original_vertices)
    }
}

impl std::fmt::Display for SubdivisionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Subdivision ({:?}): {} → {} faces ({:.1}x), +{} vertices, {} iterations",
            self.method,
            self.original_faces,
            self.final_faces,
            self.face_ratio(),
            self.vertices_added(),
            self.iterations
        )
    }
}
