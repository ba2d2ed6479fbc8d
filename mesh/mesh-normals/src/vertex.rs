//! Per-vertex normals from incident faces.

use mesh_types::{IndexedMesh, Vector3, Vertex, face_normal, newell_normal, unique_vertex_count};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative length below which an accumulated normal counts as cancelled.
const CANCELLATION_EPSILON: f64 = 1e-12;

/// How face normals are weighted when averaged at a vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormalWeighting {
    /// Every incident face counts the same.
    Uniform,
    /// Faces count in proportion to their area.
    #[default]
    Area,
}

/// Vertex normals with the vertices whose normal could not be formed.
///
/// A vertex whose incident face normals cancel out (or whose faces are all
/// degenerate) keeps a zero vector and is listed in `zero_length`; it is
/// never given an arbitrary direction. Unreferenced vertices are zero and
/// not listed.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexNormals {
    /// One normal per vertex, unit length or zero.
    pub normals: Vec<Vector3<f64>>,
    /// Referenced vertices left with a zero normal, ascending.
    pub zero_length: Vec<u32>,
}

impl VertexNormals {
    /// Unit normal of a vertex, or `None` if it is zero.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<Vector3<f64>> {
        self.normals
            .get(vertex)
            .copied()
            .filter(|n| *n != Vector3::zeros())
    }

    /// Whether every referenced vertex received a normal.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.zero_length.is_empty()
    }
}

/// Average the unit normals of the faces around each vertex.
#[must_use]
pub fn vertex_normals_unweighted(mesh: &IndexedMesh) -> VertexNormals {
    vertex_normals(mesh, NormalWeighting::Uniform)
}

/// Average face normals around each vertex, weighted by face area.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_normals::vertex_normals_area_weighted;
///
/// let normals = vertex_normals_area_weighted(&unit_cube());
/// assert!(normals.is_complete());
///
/// // Corner normals point away from the cube center
/// let n = normals.get(6).unwrap();
/// assert!(n.x > 0.0 && n.y > 0.0 && n.z > 0.0);
/// ```
#[must_use]
pub fn vertex_normals_area_weighted(mesh: &IndexedMesh) -> VertexNormals {
    vertex_normals(mesh, NormalWeighting::Area)
}

/// Compute vertex normals with the given weighting.
///
/// Faces must reference vertices in range; see [`IndexedMesh::validate`].
#[must_use]
pub fn vertex_normals(mesh: &IndexedMesh, weighting: NormalWeighting) -> VertexNormals {
    let mut sums = vec![Vector3::zeros(); mesh.vertices.len()];
    let mut magnitudes = vec![0.0_f64; mesh.vertices.len()];
    let mut referenced = vec![false; mesh.vertices.len()];

    for face in &mesh.faces {
        let contribution = face_contribution(&mesh.vertices, face, weighting);
        for (k, &v) in face.iter().enumerate() {
            if face[..k].contains(&v) {
                continue;
            }
            let v = v as usize;
            referenced[v] = true;
            if let Some(c) = contribution {
                sums[v] += c;
                magnitudes[v] += c.norm();
            }
        }
    }

    let mut zero_length = Vec::new();
    let normals = sums
        .into_iter()
        .enumerate()
        .map(|(v, sum)| {
            if !referenced[v] {
                return Vector3::zeros();
            }
            finish(sum, magnitudes[v]).unwrap_or_else(|| {
                zero_length.push(v as u32);
                Vector3::zeros()
            })
        })
        .collect();

    if zero_length.is_empty() {
        debug!("Computed vertex normals for {} vertices", mesh.vertices.len());
    } else {
        warn!(
            "{} vertices have no usable normal (incident normals cancel)",
            zero_length.len()
        );
    }

    VertexNormals {
        normals,
        zero_length,
    }
}

/// The vector one face adds to each of its vertices.
pub(crate) fn face_contribution(
    vertices: &[Vertex],
    face: &[u32],
    weighting: NormalWeighting,
) -> Option<Vector3<f64>> {
    match weighting {
        NormalWeighting::Uniform => face_normal(vertices, face),
        // Newell vector length is twice the face area
        NormalWeighting::Area => {
            (unique_vertex_count(face) >= 3).then(|| newell_normal(vertices, face))
        }
    }
}

/// Normalize an accumulated sum unless it cancelled relative to its parts.
pub(crate) fn finish(sum: Vector3<f64>, magnitude: f64) -> Option<Vector3<f64>> {
    let len = sum.norm();
    if magnitude <= 0.0 || len <= CANCELLATION_EPSILON * magnitude {
        None
    } else {
        Some(sum / len)
    }
}
