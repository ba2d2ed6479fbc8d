//! Auto-smooth and smooth shading.

use mesh_types::{IndexedMesh, MeshIndex, Vector3};
use tracing::{info, warn};

use crate::dihedral::{check_angle, classify_in};
use crate::error::NormalsResult;
use crate::fans::{CornerFans, corner_fans};
use crate::vertex::{NormalWeighting, face_contribution, finish, vertex_normals};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`auto_smooth`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AutoSmoothParams {
    /// Edges whose dihedral angle is at least this are hard. Default: `30.0`
    pub angle_threshold_degrees: f64,
    /// Face weighting inside each fan. Default: area
    pub weighting: NormalWeighting,
}

impl Default for AutoSmoothParams {
    fn default() -> Self {
        Self {
            angle_threshold_degrees: 30.0,
            weighting: NormalWeighting::Area,
        }
    }
}

impl AutoSmoothParams {
    /// Params with the given angle threshold.
    #[must_use]
    pub fn with_angle(degrees: f64) -> Self {
        Self {
            angle_threshold_degrees: degrees,
            ..Default::default()
        }
    }

    /// Set the face weighting.
    #[must_use]
    pub const fn with_weighting(mut self, weighting: NormalWeighting) -> Self {
        self.weighting = weighting;
        self
    }
}

/// Result of [`auto_smooth`].
#[derive(Debug, Clone)]
pub struct AutoSmoothResult {
    /// Mesh with one vertex per fan and a normal on every referenced vertex.
    pub mesh: IndexedMesh,
    /// Original vertex of every output vertex.
    pub source_vertex: Vec<u32>,
    /// Number of hard edges found.
    pub hard_edges: usize,
    /// Number of vertex copies added along hard edges.
    pub vertices_split: usize,
    /// Output vertices whose fan normals cancelled; their normal is zero.
    pub zero_length: Vec<u32>,
}

/// Shade smooth within fans and sharp across hard edges.
///
/// Face corners around each vertex are grouped into fans connected by
/// smooth edges. Each fan accumulates only its own faces' normals and
/// becomes its own vertex, so normals are continuous across smooth edges
/// and discontinuous across hard ones. Without hard edges the vertex
/// buffer keeps its order and only normals change.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or the threshold is NaN.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_normals::{auto_smooth, AutoSmoothParams};
///
/// let result = auto_smooth(&unit_cube(), &AutoSmoothParams::default()).unwrap();
/// // Every cube corner is split once per side
/// assert_eq!(result.mesh.vertices.len(), 24);
/// assert_eq!(result.hard_edges, 12);
/// ```
pub fn auto_smooth(mesh: &IndexedMesh, params: &AutoSmoothParams) -> NormalsResult<AutoSmoothResult> {
    mesh.validate()?;
    check_angle(params.angle_threshold_degrees)?;

    let index = MeshIndex::new(mesh);
    let edges = classify_in(&index, params.angle_threshold_degrees);
    let fans = corner_fans(mesh, &edges);
    let fan_normals = fan_normals(mesh, &fans, params.weighting);

    let (mut smoothed, source_vertex, fan_index) = split_with_map(mesh, &fans);
    let mut zero_length = Vec::new();
    for (fan, normal) in fan_normals.into_iter().enumerate() {
        let v = fan_index[fan];
        if let Some(n) = normal {
            smoothed.vertices[v as usize].normal = Some(n);
        } else {
            smoothed.vertices[v as usize].normal = Some(Vector3::zeros());
            zero_length.push(v);
        }
    }
    zero_length.sort_unstable();
    if !zero_length.is_empty() {
        warn!("{} fans have no usable normal", zero_length.len());
    }

    let vertices_split = smoothed.vertices.len() - mesh.vertices.len();
    info!(
        hard_edges = edges.hard_edge_count(),
        vertices_split, "Auto-smoothed at {} degrees", params.angle_threshold_degrees
    );

    Ok(AutoSmoothResult {
        mesh: smoothed,
        source_vertex,
        hard_edges: edges.hard_edge_count(),
        vertices_split,
        zero_length,
    })
}

/// Give each fan its own vertex.
///
/// The first fan of each vertex keeps the original index; further fans
/// are appended as copies. Unreferenced vertices stay where they are.
/// Returns the new mesh and the original vertex of every output vertex.
#[must_use]
pub fn split_by_fans(mesh: &IndexedMesh, fans: &CornerFans) -> (IndexedMesh, Vec<u32>) {
    let (split, source, _) = split_with_map(mesh, fans);
    (split, source)
}

#[allow(clippy::cast_possible_truncation)]
fn split_with_map(mesh: &IndexedMesh, fans: &CornerFans) -> (IndexedMesh, Vec<u32>, Vec<u32>) {
    let mut vertices = mesh.vertices.clone();
    let mut source: Vec<u32> = (0..mesh.vertices.len() as u32).collect();
    let mut claimed = vec![false; mesh.vertices.len()];
    let mut fan_index = Vec::with_capacity(fans.fan_count());

    for fan in 0..fans.fan_count() as u32 {
        let v = fans.vertex_of(fan);
        if claimed[v as usize] {
            fan_index.push(vertices.len() as u32);
            vertices.push(mesh.vertices[v as usize].clone());
            source.push(v);
        } else {
            claimed[v as usize] = true;
            fan_index.push(v);
        }
    }

    let faces = (0..mesh.faces.len())
        .map(|f| {
            fans.fans_of_face(f)
                .iter()
                .map(|&fan| fan_index[fan as usize])
                .collect()
        })
        .collect();

    (IndexedMesh::from_parts(vertices, faces), source, fan_index)
}

fn fan_normals(
    mesh: &IndexedMesh,
    fans: &CornerFans,
    weighting: NormalWeighting,
) -> Vec<Option<Vector3<f64>>> {
    let mut sums = vec![Vector3::zeros(); fans.fan_count()];
    let mut magnitudes = vec![0.0_f64; fans.fan_count()];

    for (f, face) in mesh.faces.iter().enumerate() {
        let Some(contribution) = face_contribution(&mesh.vertices, face, weighting) else {
            continue;
        };
        let face_fans = fans.fans_of_face(f);
        for (k, &fan) in face_fans.iter().enumerate() {
            if face_fans[..k].contains(&fan) {
                continue;
            }
            sums[fan as usize] += contribution;
            magnitudes[fan as usize] += contribution.norm();
        }
    }

    sums.into_iter()
        .zip(magnitudes)
        .map(|(sum, magnitude)| finish(sum, magnitude))
        .collect()
}

/// Result of [`smooth_shade`].
#[derive(Debug, Clone)]
pub struct ShadeResult {
    /// Mesh with area-weighted normals on every referenced vertex.
    pub mesh: IndexedMesh,
    /// Vertices whose normal cancelled; their normal is zero.
    pub zero_length: Vec<u32>,
}

/// Assign area-weighted vertex normals to a copy of `mesh`.
///
/// Topology is untouched. Unreferenced vertices get no normal.
///
/// # Errors
///
/// Returns an error if the mesh is invalid.
pub fn smooth_shade(mesh: &IndexedMesh) -> NormalsResult<ShadeResult> {
    mesh.validate()?;
    let normals = vertex_normals(mesh, NormalWeighting::Area);
    let referenced = mesh.referenced_vertices();

    let mut shaded = mesh.clone();
    for ((vertex, normal), used) in shaded
        .vertices
        .iter_mut()
        .zip(&normals.normals)
        .zip(referenced)
    {
        vertex.normal = used.then_some(*normal);
    }

    Ok(ShadeResult {
        mesh: shaded,
        zero_length: normals.zero_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Vertex, unit_cube};

    fn flat_pair() -> IndexedMesh {
        IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            &[[0, 1, 2], [1, 3, 2]],
        )
    }

    #[test]
    fn flat_pair_shares_normals_at_30_degrees() {
        let mesh = flat_pair();
        let result = auto_smooth(&mesh, &AutoSmoothParams::with_angle(30.0)).unwrap();
        assert_eq!(result.hard_edges, 0);
        assert_eq!(result.vertices_split, 0);
        assert_eq!(result.mesh.faces, mesh.faces);
        for vertex in &result.mesh.vertices {
            assert_relative_eq!(vertex.normal.unwrap(), Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn flat_pair_splits_at_zero_degrees() {
        let mesh = flat_pair();
        let result = auto_smooth(&mesh, &AutoSmoothParams::with_angle(0.0)).unwrap();
        assert_eq!(result.hard_edges, 1);
        assert_eq!(result.vertices_split, 2);
        assert_eq!(result.mesh.vertices.len(), 6);
        assert_eq!(result.source_vertex, vec![0, 1, 2, 3, 1, 2]);
        // The faces no longer share vertices
        assert_eq!(result.mesh.faces[1].as_slice(), &[4, 3, 5]);
    }

    #[test]
    fn cube_sides_keep_flat_normals() {
        let result = auto_smooth(&unit_cube(), &AutoSmoothParams::default()).unwrap();
        let mesh = &result.mesh;
        for face in &mesh.faces {
            let face_n = mesh_types::face_normal(&mesh.vertices, face).unwrap();
            for &v in face {
                assert_relative_eq!(mesh.vertices[v as usize].normal.unwrap(), face_n, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn high_threshold_matches_smooth_shading() {
        let cube = unit_cube();
        let smoothed = auto_smooth(&cube, &AutoSmoothParams::with_angle(180.0)).unwrap();
        let shaded = smooth_shade(&cube).unwrap();
        assert_eq!(smoothed.mesh.vertices.len(), 8);
        for (a, b) in smoothed.mesh.vertices.iter().zip(&shaded.mesh.vertices) {
            assert_relative_eq!(a.normal.unwrap(), b.normal.unwrap(), epsilon = 1e-12);
        }
    }

    #[test]
    fn smooth_shade_skips_unreferenced() {
        let mut mesh = flat_pair();
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0));
        let result = smooth_shade(&mesh).unwrap();
        assert!(result.zero_length.is_empty());
        assert!(result.mesh.vertices[4].normal.is_none());
        assert!(result.mesh.vertices[0].normal.is_some());
        assert_eq!(result.mesh.faces, mesh.faces);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mut mesh = flat_pair();
        mesh.faces[0][0] = 42;
        assert!(auto_smooth(&mesh, &AutoSmoothParams::default()).unwrap_err().is_input_error());
        assert!(smooth_shade(&mesh).is_err());
    }
}
