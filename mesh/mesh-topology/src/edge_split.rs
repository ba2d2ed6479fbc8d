//! Hard-edge vertex splitting.

use mesh_normals::{classify_edges, corner_fans, split_by_fans};
use mesh_types::IndexedMesh;
use tracing::info;

use crate::error::TopologyResult;

/// Result of [`edge_split`].
#[derive(Debug, Clone)]
pub struct EdgeSplitResult {
    /// Mesh whose faces no longer share vertices across hard edges.
    pub mesh: IndexedMesh,
    /// Original vertex of every output vertex.
    pub source_vertex: Vec<u32>,
    /// Number of hard edges found.
    pub hard_edges: usize,
    /// Number of vertex copies appended.
    pub vertices_added: usize,
}

/// Duplicate vertices along hard edges.
///
/// An edge is hard when its dihedral angle is at least
/// `angle_threshold_degrees`, or when three or more faces share it. Around
/// each vertex the faces between hard edges keep one shared copy, so
/// normals computed afterwards are continuous on smooth regions and
/// discontinuous across creases. Positions are not moved and no face is
/// added or removed.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or the threshold is NaN.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_topology::edge_split;
///
/// let result = edge_split(&unit_cube(), 30.0).unwrap();
/// assert_eq!(result.mesh.vertices.len(), 24);
/// ```
pub fn edge_split(mesh: &IndexedMesh, angle_threshold_degrees: f64) -> TopologyResult<EdgeSplitResult> {
    let edges = classify_edges(mesh, angle_threshold_degrees)?;
    let fans = corner_fans(mesh, &edges);
    let (split, source_vertex) = split_by_fans(mesh, &fans);

    let vertices_added = split.vertices.len() - mesh.vertices.len();
    info!(
        hard_edges = edges.hard_edge_count(),
        vertices_added, "Split hard edges at {angle_threshold_degrees} degrees"
    );

    Ok(EdgeSplitResult {
        mesh: split,
        source_vertex,
        hard_edges: edges.hard_edge_count(),
        vertices_added,
    })
}
