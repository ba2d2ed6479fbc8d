//! Defect queries.
//!
//! Every query is a pure function of the mesh buffers. Lists are returned
//! sorted so results are reproducible; an absent defect is an empty list,
//! never a missing value.

use hashbrown::{HashMap, HashSet};
use mesh_types::{Edge, Face, IndexedMesh, MeshAdjacency, face_area, unique_vertex_count};
use smallvec::SmallVec;

/// Check that every edge is shared by exactly two faces.
///
/// Equivalent to `open_edges(mesh).is_empty()` together with the absence
/// of non-manifold edges. An empty mesh is vacuously watertight.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, IndexedMesh};
/// use mesh_repair::is_watertight;
///
/// assert!(is_watertight(&unit_cube()));
/// assert!(is_watertight(&IndexedMesh::new()));
/// ```
#[must_use]
pub fn is_watertight(mesh: &IndexedMesh) -> bool {
    MeshAdjacency::build(&mesh.faces).is_watertight()
}

/// Edges used by exactly one face, sorted.
#[must_use]
pub fn open_edges(mesh: &IndexedMesh) -> Vec<Edge> {
    open_edges_in(&MeshAdjacency::build(&mesh.faces))
}

pub(crate) fn open_edges_in(adjacency: &MeshAdjacency) -> Vec<Edge> {
    let mut edges: Vec<Edge> = adjacency.boundary_edges().collect();
    edges.sort_unstable();
    edges
}

/// Faces containing at least one edge shared by three or more faces, sorted.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::non_manifold_faces;
///
/// // Three triangles hinged on edge (0, 1)
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.5, -1.0, 0.0], [0.5, 0.0, 1.0]],
///     &[[0, 1, 2], [1, 0, 3], [0, 1, 4]],
/// );
/// assert_eq!(non_manifold_faces(&mesh), vec![0, 1, 2]);
/// ```
#[must_use]
pub fn non_manifold_faces(mesh: &IndexedMesh) -> Vec<usize> {
    non_manifold_faces_in(&MeshAdjacency::build(&mesh.faces))
}

pub(crate) fn non_manifold_faces_in(adjacency: &MeshAdjacency) -> Vec<usize> {
    let mut faces: Vec<usize> = adjacency
        .edges()
        .filter(|(_, faces)| faces.len() > 2)
        .flat_map(|(_, faces)| faces.iter().copied())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    faces.sort_unstable();
    faces
}

/// Number of vertices whose position exactly equals an earlier vertex.
///
/// This is `|V| - |unique positions|` with exact floating-point equality
/// (`-0.0 == 0.0`). Near-duplicates are not counted; see
/// [`weld_vertices`](crate::weld_vertices) for tolerance-based merging.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::duplicate_vertex_count;
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 1e-9]],
///     &[[0, 1, 3]],
/// );
/// assert_eq!(duplicate_vertex_count(&mesh), 1);
/// ```
#[must_use]
pub fn duplicate_vertex_count(mesh: &IndexedMesh) -> usize {
    let unique: HashSet<[u64; 3]> = mesh.vertices.iter().map(|v| v.position_key()).collect();
    mesh.vertices.len() - unique.len()
}

/// Faces with area below `epsilon` or fewer than three distinct vertices, sorted.
#[must_use]
pub fn degenerate_faces(mesh: &IndexedMesh, epsilon: f64) -> Vec<usize> {
    mesh.faces
        .iter()
        .enumerate()
        .filter(|(_, face)| is_degenerate(mesh, face, epsilon))
        .map(|(i, _)| i)
        .collect()
}

pub(crate) fn is_degenerate(mesh: &IndexedMesh, face: &[u32], epsilon: f64) -> bool {
    unique_vertex_count(face) < 3 || face_area(&mesh.vertices, face) < epsilon
}

/// Faces that repeat the vertex cycle of an earlier face, in either winding.
#[must_use]
pub fn duplicate_faces(faces: &[Face]) -> Vec<usize> {
    let mut seen: HashMap<SmallVec<[u32; 4]>, usize> = HashMap::with_capacity(faces.len());
    let mut duplicates = Vec::new();
    for (i, face) in faces.iter().enumerate() {
        let key = canonical_cycle(face);
        if seen.contains_key(&key) {
            duplicates.push(i);
        } else {
            seen.insert(key, i);
        }
    }
    duplicates
}

/// Rotation- and winding-independent key for a vertex cycle.
fn canonical_cycle(face: &[u32]) -> SmallVec<[u32; 4]> {
    let n = face.len();
    let Some(start) = (0..n).min_by_key(|&i| face[i]) else {
        return SmallVec::new();
    };
    let forward: SmallVec<[u32; 4]> = (0..n).map(|k| face[(start + k) % n]).collect();
    let backward: SmallVec<[u32; 4]> = (0..n).map(|k| face[(start + n - k) % n]).collect();
    forward.min(backward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn open_box() -> IndexedMesh {
        let mut cube = unit_cube();
        // Drop the two top triangles
        cube.faces.drain(2..4);
        cube
    }

    #[test]
    fn watertight_iff_no_open_edges() {
        let cube = unit_cube();
        assert!(is_watertight(&cube));
        assert!(open_edges(&cube).is_empty());

        let open = open_box();
        assert!(!is_watertight(&open));
        assert_eq!(open_edges(&open).len(), 4);
    }

    #[test]
    fn open_edges_are_sorted() {
        let edges = open_edges(&open_box());
        let mut sorted = edges.clone();
        sorted.sort();
        assert_eq!(edges, sorted);
        assert_eq!(
            edges,
            vec![Edge::new(4, 5), Edge::new(4, 7), Edge::new(5, 6), Edge::new(6, 7)]
        );
    }

    #[test]
    fn empty_mesh_has_no_defects() {
        let mesh = IndexedMesh::new();
        assert!(is_watertight(&mesh));
        assert!(open_edges(&mesh).is_empty());
        assert!(non_manifold_faces(&mesh).is_empty());
        assert_eq!(duplicate_vertex_count(&mesh), 0);
        assert!(degenerate_faces(&mesh, 1e-12).is_empty());
    }

    #[test]
    fn duplicate_vertex_count_counts_extra_copies() {
        let mut cube = unit_cube();
        cube.vertices[7].position = cube.vertices[3].position;
        assert_eq!(duplicate_vertex_count(&cube), 1);

        cube.vertices[6].position = cube.vertices[3].position;
        assert_eq!(duplicate_vertex_count(&cube), 2);
    }

    #[test]
    fn exact_equality_only() {
        let mesh = IndexedMesh::from_arrays(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1e-300]], &[] as &[[u32; 3]]);
        assert_eq!(duplicate_vertex_count(&mesh), 0);

        let mesh = IndexedMesh::from_arrays(&[[0.0, 0.0, 0.0], [-0.0, 0.0, -0.0]], &[] as &[[u32; 3]]);
        assert_eq!(duplicate_vertex_count(&mesh), 1);
    }

    #[test]
    fn degenerate_includes_repeated_indices() {
        let mesh = IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [2.0, 0.0, 0.0]],
            &[[0, 1, 2], [0, 1, 1], [0, 1, 3]],
        );
        assert_eq!(degenerate_faces(&mesh, 1e-12), vec![1, 2]);
        // Zero epsilon still flags repeated indices
        assert_eq!(degenerate_faces(&mesh, 0.0), vec![1]);
    }

    #[test]
    fn duplicate_faces_any_rotation_or_winding() {
        let faces: Vec<Face> = [[0u32, 1, 2], [1, 2, 0], [2, 1, 0], [0, 1, 3]]
            .iter()
            .map(|f| Face::from_slice(f))
            .collect();
        assert_eq!(duplicate_faces(&faces), vec![1, 2]);

        let quads: Vec<Face> = vec![Face::from_slice(&[0, 1, 2, 3]), Face::from_slice(&[2, 1, 0, 3])];
        assert_eq!(duplicate_faces(&quads), vec![1]);
    }
}
