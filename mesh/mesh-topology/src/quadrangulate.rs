//! Greedy triangle-pair quadrangulation.

use mesh_normals::dihedral_angle_degrees;
use mesh_types::{Face, IndexedMesh, MeshAdjacency, face_normal};
use smallvec::smallvec;
use tracing::{info, warn};

use crate::error::{TopologyError, TopologyResult};

/// Result of [`quadrangulate`].
#[derive(Debug, Clone)]
pub struct QuadrangulateResult {
    /// All-quad mesh. Vertex buffer is unchanged.
    pub mesh: IndexedMesh,
    /// Number of quads produced, always half the input triangle count.
    pub quads: usize,
}

/// Merge every triangle with one neighbor into a quad.
///
/// Triangles are visited in buffer order. Each unpaired triangle takes the
/// unpaired neighbor across a manifold edge whose pair has four distinct
/// vertices, preferring the flattest pair (smallest dihedral angle, then
/// lowest face index). The quad keeps the first triangle's winding and
/// first vertex.
///
/// Pairing is all or nothing: if any triangle is left over the operation
/// fails and no mesh is produced.
///
/// # Errors
///
/// - [`TopologyError::Mesh`] if the mesh is invalid or empty
/// - [`TopologyError::NotTriangulated`] if any face is not a triangle
/// - [`TopologyError::IncompletePairing`] if the triangles do not pair up
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_topology::quadrangulate;
///
/// let result = quadrangulate(&unit_cube()).unwrap();
/// assert_eq!(result.quads, 6);
/// ```
pub fn quadrangulate(mesh: &IndexedMesh) -> TopologyResult<QuadrangulateResult> {
    mesh.require_faces()?;
    if let Some((face, f)) = mesh.faces.iter().enumerate().find(|(_, f)| f.len() != 3) {
        return Err(TopologyError::NotTriangulated { face, len: f.len() });
    }

    let adjacency = MeshAdjacency::build(&mesh.faces);
    let normals = mesh.face_normals();
    let mut partner: Vec<Option<usize>> = vec![None; mesh.faces.len()];
    let mut quads: Vec<Face> = Vec::with_capacity(mesh.faces.len() / 2);

    for t in 0..mesh.faces.len() {
        if partner[t].is_some() {
            continue;
        }
        let tri = &mesh.faces[t];

        let mut best: Option<(f64, usize, Face)> = None;
        for i in 0..3 {
            let (a, b) = (tri[i], tri[(i + 1) % 3]);
            let shared = adjacency.faces_for_edge(a, b);
            if shared.len() != 2 {
                continue;
            }
            let Some(&u) = shared.iter().find(|&&u| u != t) else {
                continue;
            };
            if partner[u].is_some() {
                continue;
            }
            let Some(quad) = merge_pair(tri, &mesh.faces[u], i) else {
                continue;
            };
            let angle = match (normals[t], normals[u]) {
                (Some(n1), Some(n2)) => dihedral_angle_degrees(&n1, &n2),
                _ => 180.0,
            };
            let better = best
                .as_ref()
                .is_none_or(|&(best_angle, best_u, _)| angle < best_angle || (angle == best_angle && u < best_u));
            if better {
                best = Some((angle, u, quad));
            }
        }

        if let Some((_, u, quad)) = best {
            partner[t] = Some(u);
            partner[u] = Some(t);
            quads.push(quad);
        }
    }

    let triangles = mesh.faces.len();
    let paired = quads.len() * 2;
    if paired != triangles {
        warn!("Could not fully quadrangulate: paired {paired} of {triangles} triangles");
        return Err(TopologyError::IncompletePairing { paired, triangles });
    }

    info!("Quadrangulated {triangles} triangles into {} quads", quads.len());
    let count = quads.len();
    Ok(QuadrangulateResult {
        mesh: IndexedMesh::from_parts(mesh.vertices.clone(), quads),
        quads: count,
    })
}

/// Quad from `tri` and its neighbor across edge `tri[i] -> tri[i + 1]`.
///
/// The neighbor's far vertex is inserted into that edge. Returns `None`
/// unless the four corners are distinct.
fn merge_pair(tri: &[u32], other: &[u32], i: usize) -> Option<Face> {
    let (a, b) = (tri[i], tri[(i + 1) % 3]);
    let mut far = other.iter().copied().filter(|&v| v != a && v != b);
    let opposite = far.next()?;
    if far.next().is_some() || tri.contains(&opposite) {
        return None;
    }
    if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
        return None;
    }

    let quad: Face = match i {
        0 => smallvec![tri[0], opposite, tri[1], tri[2]],
        1 => smallvec![tri[0], tri[1], opposite, tri[2]],
        _ => smallvec![tri[0], tri[1], tri[2], opposite],
    };
    Some(quad)
}
