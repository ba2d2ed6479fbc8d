//! Tolerance-based vertex welding.

use mesh_spatial::ProximityIndex;
use mesh_types::{Face, IndexedMesh, unique_vertex_count};
use tracing::{debug, info};

use crate::components::drop_orphaned_vertices;

/// Result of [`weld_vertices`].
#[derive(Debug, Clone)]
pub struct WeldResult {
    /// The welded, compacted mesh.
    pub mesh: IndexedMesh,
    /// Number of vertices merged into a representative.
    pub vertices_merged: usize,
    /// Number of faces dropped because welding collapsed them below three
    /// distinct vertices.
    pub faces_collapsed: usize,
}

impl WeldResult {
    /// Whether welding changed anything.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.vertices_merged > 0
    }
}

/// Merge vertices that lie within `threshold` of each other.
///
/// Vertices are grouped by the connected components of the "within
/// threshold" graph (distance `<= threshold`), so chains of close vertices
/// weld together even when the ends are farther apart. Each group is
/// represented by its **lowest original index**, which keeps the output
/// independent of query order. Faces are remapped, repeated consecutive
/// indices are collapsed, faces left with fewer than three distinct
/// vertices are dropped, and merged-away vertices are compacted out.
///
/// A `threshold <= 0` (or NaN) is the identity.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::weld_vertices;
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0001, 0.0, 0.0]],
///     &[[0, 1, 2], [0, 2, 3]],
/// );
///
/// let welded = weld_vertices(&mesh, 0.001);
/// assert_eq!(welded.vertices_merged, 1);
/// assert_eq!(welded.mesh.vertices.len(), 3);
/// assert_eq!(welded.mesh.faces[1].as_slice(), &[0, 2, 1]);
/// ```
#[must_use]
pub fn weld_vertices(mesh: &IndexedMesh, threshold: f64) -> WeldResult {
    if threshold.is_nan() || threshold <= 0.0 || mesh.vertices.is_empty() {
        return WeldResult {
            mesh: mesh.clone(),
            vertices_merged: 0,
            faces_collapsed: 0,
        };
    }

    let representative = weld_groups(mesh, threshold);
    let vertices_merged = representative
        .iter()
        .enumerate()
        .filter(|&(i, &r)| r as usize != i)
        .count();

    if vertices_merged == 0 {
        debug!(threshold, "Weld found nothing to merge");
        return WeldResult {
            mesh: mesh.clone(),
            vertices_merged: 0,
            faces_collapsed: 0,
        };
    }

    let mut faces = Vec::with_capacity(mesh.faces.len());
    let mut faces_collapsed = 0;
    for face in &mesh.faces {
        let remapped = collapse_repeats(face.iter().map(|&v| representative[v as usize]));
        if unique_vertex_count(&remapped) < 3 {
            faces_collapsed += 1;
        } else {
            faces.push(remapped);
        }
    }

    // Merged vertices go away along with anything orphaned by collapsed faces
    let used_before = mesh.referenced_vertices();
    let welded = IndexedMesh::from_parts(mesh.vertices.clone(), faces);
    let keep: Vec<bool> = representative
        .iter()
        .enumerate()
        .map(|(i, &r)| r as usize == i)
        .collect();
    let (without_merged, _) = welded.retain_vertices(&keep);
    let used_before: Vec<bool> = used_before
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(u, _)| *u)
        .collect();
    let (mesh_out, _) = drop_orphaned_vertices(&without_merged, &used_before);

    info!(
        "Welded {} vertices (threshold {}), collapsed {} faces",
        vertices_merged, threshold, faces_collapsed
    );

    WeldResult {
        mesh: mesh_out,
        vertices_merged,
        faces_collapsed,
    }
}

/// Map every vertex to the lowest index of its weld group.
#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
fn weld_groups(mesh: &IndexedMesh, threshold: f64) -> Vec<u32> {
    let index = ProximityIndex::from_vertices(&mesh.vertices);
    let mut parent: Vec<u32> = (0..mesh.vertices.len() as u32).collect();

    for (i, vertex) in mesh.vertices.iter().enumerate() {
        for j in index.within(&vertex.position, threshold) {
            if j != i {
                union(&mut parent, i as u32, j as u32);
            }
        }
    }

    (0..parent.len() as u32).map(|v| find(&mut parent, v)).collect()
}

fn find(parent: &mut [u32], mut v: u32) -> u32 {
    while parent[v as usize] != v {
        let grandparent = parent[parent[v as usize] as usize];
        parent[v as usize] = grandparent;
        v = grandparent;
    }
    v
}

/// Union keeping the smaller root, so every root is its group's minimum.
fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra < rb {
        parent[rb as usize] = ra;
    } else if rb < ra {
        parent[ra as usize] = rb;
    }
}

/// Remove consecutive (cyclic) repeated indices from a remapped face.
fn collapse_repeats(indices: impl Iterator<Item = u32>) -> Face {
    let mut face = Face::new();
    for v in indices {
        if face.last() != Some(&v) {
            face.push(v);
        }
    }
    while face.len() > 1 && face.first() == face.last() {
        face.pop();
    }
    face
}
