//! Connected component analysis and island cleanup.
//!
//! Two faces are connected when they share an edge. Faces that only touch
//! at a vertex belong to different components.

use mesh_types::{Face, IndexedMesh, MeshIndex};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::error::{RepairError, RepairResult};

/// Connected components of a mesh.
#[derive(Debug, Clone, Default)]
pub struct ComponentAnalysis {
    /// Face indices of each component, ascending within a component.
    ///
    /// Components are ordered by their lowest face index.
    pub components: Vec<Vec<usize>>,
}

impl ComponentAnalysis {
    /// Number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Face count of the largest component, or 0 for an empty mesh.
    #[must_use]
    pub fn largest_component_size(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Index of the largest component (first one on ties).
    #[must_use]
    pub fn largest_component(&self) -> Option<usize> {
        self.components
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
            .map(|(i, _)| i)
    }
}

/// Result of discarding components.
#[derive(Debug, Clone)]
pub struct CleanupResult {
    /// The mesh with small components removed.
    pub mesh: IndexedMesh,
    /// Number of components removed.
    pub components_removed: usize,
    /// Number of components kept.
    pub components_kept: usize,
    /// Number of faces removed.
    pub faces_removed: usize,
    /// Number of vertices removed by compaction.
    pub vertices_removed: usize,
}

/// Find edge-connected face components.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, IndexedMesh};
/// use mesh_repair::find_connected_components;
///
/// let mut two_cubes = unit_cube();
/// let mut other = unit_cube();
/// other.translate(mesh_types::Vector3::new(5.0, 0.0, 0.0));
/// two_cubes.merge(&other);
///
/// let analysis = find_connected_components(&two_cubes);
/// assert_eq!(analysis.component_count(), 2);
/// assert_eq!(analysis.largest_component_size(), 12);
/// ```
#[must_use]
pub fn find_connected_components(mesh: &IndexedMesh) -> ComponentAnalysis {
    let index = MeshIndex::new(mesh);
    ComponentAnalysis {
        components: components_in(index.face_neighbors()),
    }
}

/// Flood fill over a face-neighbour graph.
pub(crate) fn components_in(neighbors: &[SmallVec<[usize; 4]>]) -> Vec<Vec<usize>> {
    let mut component_of = vec![usize::MAX; neighbors.len()];
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for seed in 0..neighbors.len() {
        if component_of[seed] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut faces = Vec::new();
        component_of[seed] = id;
        stack.push(seed);

        while let Some(face) = stack.pop() {
            faces.push(face);
            for &next in &neighbors[face] {
                if component_of[next] == usize::MAX {
                    component_of[next] = id;
                    stack.push(next);
                }
            }
        }

        faces.sort_unstable();
        components.push(faces);
    }

    components
}

/// Discard components with fewer than `min_face_count` faces.
///
/// Remaining components are recombined and vertices that only belonged to
/// discarded faces are compacted away.
///
/// # Errors
///
/// Returns [`RepairError::NoComponentsRemain`] when no component reaches
/// the threshold; the input mesh is untouched and should be kept.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, IndexedMesh, Vertex, Face};
/// use mesh_repair::cleanup_components;
///
/// let mut mesh = unit_cube();
/// // A stray triangle far away
/// mesh.vertices.push(Vertex::from_coords(9.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(9.0, 1.0, 0.0));
/// mesh.faces.push(Face::from_slice(&[8, 9, 10]));
///
/// let result = cleanup_components(&mesh, 5)?;
/// assert_eq!(result.mesh.faces.len(), 12);
/// assert_eq!(result.mesh.vertices.len(), 8);
/// assert_eq!(result.components_removed, 1);
/// # Ok::<(), mesh_repair::RepairError>(())
/// ```
pub fn cleanup_components(mesh: &IndexedMesh, min_face_count: usize) -> RepairResult<CleanupResult> {
    mesh.validate()?;

    let analysis = find_connected_components(mesh);
    let (kept, removed): (Vec<&Vec<usize>>, Vec<&Vec<usize>>) = analysis
        .components
        .iter()
        .partition(|c| c.len() >= min_face_count);

    if kept.is_empty() {
        return Err(RepairError::NoComponentsRemain {
            min_face_count,
            largest: analysis.largest_component_size(),
        });
    }

    let mut keep_face = vec![false; mesh.faces.len()];
    for &face in kept.iter().flat_map(|c| c.iter()) {
        keep_face[face] = true;
    }

    let result = retain_faces(mesh, &keep_face);
    debug!(
        components = analysis.component_count(),
        removed = removed.len(),
        "Component cleanup"
    );
    if !removed.is_empty() {
        info!(
            "Removed {} small components ({} faces)",
            removed.len(),
            result.faces_removed
        );
    }

    Ok(CleanupResult {
        mesh: result.mesh,
        components_removed: removed.len(),
        components_kept: kept.len(),
        faces_removed: result.faces_removed,
        vertices_removed: result.vertices_removed,
    })
}

/// Keep only the largest component.
///
/// An empty mesh is returned unchanged.
#[must_use]
pub fn keep_largest_component(mesh: &IndexedMesh) -> IndexedMesh {
    let analysis = find_connected_components(mesh);
    let Some(largest) = analysis.largest_component() else {
        return mesh.clone();
    };
    let mut keep_face = vec![false; mesh.faces.len()];
    for &face in &analysis.components[largest] {
        keep_face[face] = true;
    }
    retain_faces(mesh, &keep_face).mesh
}

/// Faces dropped from a mesh, with the resulting compaction.
#[derive(Debug, Clone)]
pub struct FaceRemoval {
    /// The new mesh.
    pub mesh: IndexedMesh,
    /// Number of faces removed.
    pub faces_removed: usize,
    /// Number of vertices removed because no remaining face used them.
    pub vertices_removed: usize,
}

impl FaceRemoval {
    /// A removal that changed nothing.
    #[must_use]
    pub fn unchanged(mesh: &IndexedMesh) -> Self {
        Self {
            mesh: mesh.clone(),
            faces_removed: 0,
            vertices_removed: 0,
        }
    }
}

/// Keep the flagged faces and drop vertices that lost their last face.
///
/// Vertices that were already unreferenced in the input are preserved.
pub(crate) fn retain_faces(mesh: &IndexedMesh, keep_face: &[bool]) -> FaceRemoval {
    let faces: Vec<Face> = mesh
        .faces
        .iter()
        .zip(keep_face)
        .filter(|(_, keep)| **keep)
        .map(|(f, _)| f.clone())
        .collect();
    let faces_removed = mesh.faces.len() - faces.len();
    if faces_removed == 0 {
        return FaceRemoval::unchanged(mesh);
    }

    let used_before = mesh.referenced_vertices();
    let filtered = IndexedMesh::from_parts(mesh.vertices.clone(), faces);
    let (mesh, vertices_removed) = drop_orphaned_vertices(&filtered, &used_before);

    FaceRemoval {
        mesh,
        faces_removed,
        vertices_removed,
    }
}

/// Drop vertices that were referenced before an edit but are not anymore.
pub(crate) fn drop_orphaned_vertices(mesh: &IndexedMesh, used_before: &[bool]) -> (IndexedMesh, usize) {
    let used_now = mesh.referenced_vertices();
    let keep: Vec<bool> = used_now
        .iter()
        .enumerate()
        .map(|(i, &now)| now || !used_before.get(i).copied().unwrap_or(false))
        .collect();
    let (compacted, _) = mesh.retain_vertices(&keep);
    let removed = mesh.vertices.len() - compacted.vertices.len();
    (compacted, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Vector3, Vertex, unit_cube};

    fn cube_at(x: f64) -> IndexedMesh {
        let mut cube = unit_cube();
        cube.translate(Vector3::new(x, 0.0, 0.0));
        cube
    }

    fn cube_and_triangle() -> IndexedMesh {
        let mut mesh = unit_cube();
        mesh.merge(&IndexedMesh::from_arrays(
            &[[9.0, 0.0, 0.0], [10.0, 0.0, 0.0], [9.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        ));
        mesh
    }

    #[test]
    fn single_component() {
        let analysis = find_connected_components(&unit_cube());
        assert_eq!(analysis.component_count(), 1);
        assert_eq!(analysis.components[0], (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn vertex_touching_faces_are_separate() {
        let mesh = IndexedMesh::from_arrays(
            &[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
            &[[0, 1, 2], [0, 3, 4]],
        );
        assert_eq!(find_connected_components(&mesh).component_count(), 2);
    }

    #[test]
    fn cleanup_removes_small_islands() {
        let result = cleanup_components(&cube_and_triangle(), 2).unwrap();
        assert_eq!(result.components_removed, 1);
        assert_eq!(result.components_kept, 1);
        assert_eq!(result.faces_removed, 1);
        assert_eq!(result.vertices_removed, 3);
        assert_eq!(result.mesh.faces.len(), 12);
    }

    #[test]
    fn cleanup_keeps_everything_at_threshold_one() {
        let mesh = cube_and_triangle();
        let result = cleanup_components(&mesh, 1).unwrap();
        assert_eq!(result.mesh, mesh);
        assert_eq!(result.components_removed, 0);
    }

    #[test]
    fn cleanup_fails_cleanly_when_nothing_survives() {
        let mesh = cube_and_triangle();
        let err = cleanup_components(&mesh, 100).unwrap_err();
        assert!(matches!(
            err,
            RepairError::NoComponentsRemain {
                min_face_count: 100,
                largest: 12
            }
        ));
        assert!(err.is_precondition());
    }

    #[test]
    fn cleanup_rejects_invalid_mesh() {
        let mesh = IndexedMesh::from_arrays(&[[0.0; 3]], &[[0, 1, 2]]);
        assert!(cleanup_components(&mesh, 1).unwrap_err().is_input_error());
    }

    #[test]
    fn keep_largest() {
        let mut mesh = cube_at(0.0);
        mesh.merge(&cube_at(3.0));
        mesh.merge(&IndexedMesh::from_arrays(
            &[[9.0, 0.0, 0.0], [10.0, 0.0, 0.0], [9.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        ));
        let largest = keep_largest_component(&mesh);
        assert_eq!(largest.faces.len(), 12);
        assert_eq!(largest.vertices.len(), 8);
        // First cube wins the tie
        assert!(largest.vertices.iter().all(|v| v.position.x <= 1.0));
    }

    #[test]
    fn isolated_vertices_survive_face_removal() {
        let mut mesh = cube_and_triangle();
        mesh.vertices.push(Vertex::from_coords(50.0, 50.0, 50.0));
        let result = cleanup_components(&mesh, 2).unwrap();
        assert_eq!(result.mesh.vertices.len(), 9);
    }
}
