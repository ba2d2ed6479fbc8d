//! Corner fans: face corners around a vertex joined through smooth edges.
//!
//! Every face corner belongs to exactly one fan. Corners at the same vertex
//! are in the same fan when a chain of smooth manifold edges connects their
//! faces around that vertex. Hard, boundary and non-manifold edges separate
//! fans, so a vertex on a hard crease has one fan per side.

use mesh_types::{Edge, IndexedMesh, MeshAdjacency};

use crate::dihedral::{EdgeClassification, EdgeKind};

/// Assignment of face corners to fans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerFans {
    offsets: Vec<usize>,
    fan_of_corner: Vec<u32>,
    fan_vertex: Vec<u32>,
}

impl CornerFans {
    /// Fan of corner `corner` of face `face`.
    ///
    /// # Panics
    ///
    /// Panics if the face or corner is out of range.
    #[must_use]
    pub fn fan(&self, face: usize, corner: usize) -> u32 {
        self.fans_of_face(face)[corner]
    }

    /// Fans of every corner of a face, in winding order.
    #[must_use]
    pub fn fans_of_face(&self, face: usize) -> &[u32] {
        &self.fan_of_corner[self.offsets[face]..self.offsets[face + 1]]
    }

    /// Total number of fans.
    #[must_use]
    pub fn fan_count(&self) -> usize {
        self.fan_vertex.len()
    }

    /// Vertex a fan sits on.
    #[must_use]
    pub fn vertex_of(&self, fan: u32) -> u32 {
        self.fan_vertex[fan as usize]
    }
}

/// Group the corners of `mesh` into fans separated by hard edges.
///
/// Fan ids are assigned in order of first appearance, walking faces and
/// corners in buffer order.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: fan count is bounded by corner count, which fits u32 for u32-indexed meshes
pub fn corner_fans(mesh: &IndexedMesh, edges: &EdgeClassification) -> CornerFans {
    let adjacency = MeshAdjacency::build(&mesh.faces);

    let mut offsets = Vec::with_capacity(mesh.faces.len() + 1);
    let mut total = 0;
    for face in &mesh.faces {
        offsets.push(total);
        total += face.len();
    }
    offsets.push(total);

    let mut parent: Vec<usize> = (0..total).collect();

    for (f, face) in mesh.faces.iter().enumerate() {
        let n = face.len();
        for k in 0..n {
            // Repeated vertices inside one face are one corner
            if let Some(first) = face[..k].iter().position(|&v| v == face[k]) {
                union(&mut parent, offsets[f] + first, offsets[f] + k);
            }

            let (a, b) = (face[k], face[(k + 1) % n]);
            if a == b || edges.kind(Edge::new(a, b)) != Some(EdgeKind::Smooth) {
                continue;
            }
            let sharing = adjacency.faces_for_edge(a, b);
            let Some(&g) = sharing.iter().find(|&&g| g != f) else {
                continue;
            };
            let other = &mesh.faces[g];
            let (Some(ka), Some(kb)) = (
                other.iter().position(|&v| v == a),
                other.iter().position(|&v| v == b),
            ) else {
                continue;
            };
            union(&mut parent, offsets[f] + k, offsets[g] + ka);
            union(&mut parent, offsets[f] + (k + 1) % n, offsets[g] + kb);
        }
    }

    let mut fan_of_root = vec![u32::MAX; total];
    let mut fan_of_corner = Vec::with_capacity(total);
    let mut fan_vertex = Vec::new();
    for face in &mesh.faces {
        for &v in face {
            let root = find(&mut parent, fan_of_corner.len());
            if fan_of_root[root] == u32::MAX {
                fan_of_root[root] = fan_vertex.len() as u32;
                fan_vertex.push(v);
            }
            fan_of_corner.push(fan_of_root[root]);
        }
    }

    CornerFans {
        offsets,
        fan_of_corner,
        fan_vertex,
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}
