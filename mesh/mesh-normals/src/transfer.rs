//! Normal transfer between meshes.

use mesh_spatial::ProximityIndex;
use mesh_types::{IndexedMesh, Vector3};
use tracing::debug;

use crate::error::{NormalsError, NormalsResult};
use crate::vertex::{NormalWeighting, vertex_normals};

/// How normals were matched from source to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMethod {
    /// Equal vertex counts; vertex `i` of the target took the normal of vertex `i`.
    IndexForIndex,
    /// Each target vertex took the normal of its closest source vertex.
    Nearest,
}

/// Result of [`transfer_normals`].
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// Copy of the target with normals assigned to every vertex.
    pub mesh: IndexedMesh,
    /// Matching strategy that was used.
    pub method: TransferMethod,
}

/// Copy vertex normals from `source` onto a copy of `target`.
///
/// With equal vertex counts the vertices are assumed to correspond and
/// normals are copied index for index. Otherwise each target vertex takes
/// the normal of the nearest source vertex. Source normals come from the
/// source vertices when all of them carry one, and are computed with area
/// weighting otherwise. Target topology is never changed.
///
/// # Errors
///
/// Returns an error if either mesh is invalid or `source` has no vertices.
pub fn transfer_normals(source: &IndexedMesh, target: &IndexedMesh) -> NormalsResult<TransferResult> {
    source.validate()?;
    target.validate()?;
    if source.vertices.is_empty() {
        return Err(NormalsError::EmptySource);
    }

    let normals = source_normals(source);
    let mut mesh = target.clone();

    let method = if source.vertices.len() == target.vertices.len() {
        for (vertex, normal) in mesh.vertices.iter_mut().zip(&normals) {
            vertex.normal = Some(*normal);
        }
        TransferMethod::IndexForIndex
    } else {
        let index = ProximityIndex::from_vertices(&source.vertices);
        for vertex in &mut mesh.vertices {
            vertex.normal = index.nearest(&vertex.position).map(|nearest| normals[nearest]);
        }
        TransferMethod::Nearest
    };

    debug!(
        ?method,
        "Transferred normals from {} to {} vertices",
        source.vertices.len(),
        target.vertices.len()
    );
    Ok(TransferResult { mesh, method })
}

fn source_normals(source: &IndexedMesh) -> Vec<Vector3<f64>> {
    let stored: Option<Vec<_>> = source.vertices.iter().map(|v| v.normal).collect();
    stored.unwrap_or_else(|| vertex_normals(source, NormalWeighting::Area).normals)
}
