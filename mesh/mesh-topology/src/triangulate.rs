//! Fan triangulation of polygon faces.

use mesh_types::{Face, IndexedMesh, unique_vertex_count};
use smallvec::smallvec;
use tracing::{debug, info};

use crate::error::TopologyResult;

/// Result of [`triangulate`].
#[derive(Debug, Clone)]
pub struct TriangulateResult {
    /// All-triangle mesh. Vertex buffer is unchanged.
    pub mesh: IndexedMesh,
    /// Polygons with more than three vertices that were split.
    pub polygons_split: usize,
    /// Faces dropped for having fewer than three distinct vertices.
    pub degenerate_removed: usize,
    /// True when the input was already clean triangles and is returned as is.
    pub was_noop: bool,
}

/// Split every polygon into a fan of triangles from its first vertex.
///
/// Faces with fewer than three distinct vertices are dropped, as are fan
/// triangles that would repeat a vertex. An input made only of triangles
/// with three distinct vertices comes back unchanged with `was_noop` set,
/// which makes the operation idempotent.
///
/// # Errors
///
/// Returns an error if the mesh is invalid.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube_quads;
/// use mesh_topology::triangulate;
///
/// let result = triangulate(&unit_cube_quads()).unwrap();
/// assert_eq!(result.mesh.faces.len(), 12);
/// assert_eq!(result.polygons_split, 6);
/// assert!(!result.was_noop);
/// ```
pub fn triangulate(mesh: &IndexedMesh) -> TopologyResult<TriangulateResult> {
    mesh.validate()?;

    if is_clean_triangles(mesh) {
        debug!("Mesh is already triangulated");
        return Ok(TriangulateResult {
            mesh: mesh.clone(),
            polygons_split: 0,
            degenerate_removed: 0,
            was_noop: true,
        });
    }

    let mut faces: Vec<Face> = Vec::with_capacity(mesh.faces.len() * 2);
    let mut polygons_split = 0;
    let mut degenerate_removed = 0;

    for face in &mesh.faces {
        if unique_vertex_count(face) < 3 {
            degenerate_removed += 1;
            continue;
        }
        if face.len() > 3 {
            polygons_split += 1;
        }
        let first = face[0];
        for pair in face[1..].windows(2) {
            let (b, c) = (pair[0], pair[1]);
            if first != b && b != c && first != c {
                faces.push(smallvec![first, b, c]);
            }
        }
    }

    info!(
        polygons_split,
        degenerate_removed,
        "Triangulated {} faces into {}",
        mesh.faces.len(),
        faces.len()
    );

    Ok(TriangulateResult {
        mesh: IndexedMesh::from_parts(mesh.vertices.clone(), faces),
        polygons_split,
        degenerate_removed,
        was_noop: false,
    })
}

/// Whether every face is a triangle with three distinct vertices.
#[must_use]
pub fn is_triangulated(mesh: &IndexedMesh) -> bool {
    is_clean_triangles(mesh)
}

fn is_clean_triangles(mesh: &IndexedMesh) -> bool {
    mesh.faces
        .iter()
        .all(|f| f.len() == 3 && f[0] != f[1] && f[1] != f[2] && f[0] != f[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{face_area, unit_cube, unit_cube_quads};

    #[test]
    fn triangle_mesh_is_noop() {
        let cube = unit_cube();
        let result = triangulate(&cube).unwrap();
        assert!(result.was_noop);
        assert_eq!(result.mesh, cube);
    }

    #[test]
    fn quad_cube_becomes_twelve_triangles() {
        let result = triangulate(&unit_cube_quads()).unwrap();
        assert_eq!(result.mesh.faces.len(), 12);
        assert_eq!(result.mesh.faces[0].as_slice(), &[0, 3, 2]);
        assert_eq!(result.mesh.faces[1].as_slice(), &[0, 2, 1]);

        let area: f64 = result
            .mesh
            .faces
            .iter()
            .map(|f| face_area(&result.mesh.vertices, f))
            .sum();
        assert_relative_eq!(area, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn pentagon_fans_from_first_vertex() {
        let mesh = IndexedMesh::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [3.0, 1.0, 0.0],
                [1.0, 2.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
            &[[0, 1, 2, 3, 4]],
        );
        let result = triangulate(&mesh).unwrap();
        let faces: Vec<&[u32]> = result.mesh.faces.iter().map(|f| f.as_slice()).collect();
        assert_eq!(faces, vec![&[0_u32, 1, 2][..], &[0, 2, 3], &[0, 3, 4]]);
    }

    #[test]
    fn degenerate_faces_are_dropped() {
        let mesh = IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            &[vec![0, 1, 2], vec![0, 0, 1], vec![1, 1, 3, 3]],
        );
        let result = triangulate(&mesh).unwrap();
        assert_eq!(result.degenerate_removed, 2);
        assert_eq!(result.mesh.faces.len(), 1);
        assert!(!result.was_noop);
    }

    #[test]
    fn repeated_corner_skips_collapsed_fan_triangles() {
        let mesh = IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            &[[0, 1, 1, 2]],
        );
        let result = triangulate(&mesh).unwrap();
        assert_eq!(result.mesh.faces.len(), 1);
        assert_eq!(result.mesh.faces[0].as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn second_pass_is_noop() {
        let once = triangulate(&unit_cube_quads()).unwrap().mesh;
        let twice = triangulate(&once).unwrap();
        assert!(twice.was_noop);
        assert_eq!(twice.mesh, once);
    }

    #[test]
    fn invalid_mesh_is_input_error() {
        let mesh = IndexedMesh::from_arrays(&[[0.0, 0.0, 0.0]], &[[0, 1, 2]]);
        assert!(triangulate(&mesh).unwrap_err().is_input_error());
    }
}
