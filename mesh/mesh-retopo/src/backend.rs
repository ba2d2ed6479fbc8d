//! Capabilities the orchestration layer delegates to.

use mesh_types::IndexedMesh;

use crate::error::RetopoResult;

/// Reduces face count while approximating the shape.
///
/// Implementations borrow the input and return new buffers; they may change
/// vertex count and ordering. The target is a goal, not a guarantee.
pub trait Decimator {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Produce a mesh with roughly `target_faces` faces.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot process the mesh.
    fn decimate(&self, mesh: &IndexedMesh, target_faces: usize) -> RetopoResult<IndexedMesh>;
}

/// Regenerates a mesh with edges close to a uniform length.
pub trait Remesher {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Produce a mesh whose edges approach `target_edge_length`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot process the mesh.
    fn remesh(&self, mesh: &IndexedMesh, target_edge_length: f64) -> RetopoResult<IndexedMesh>;
}
