//! Grid vertex-clustering decimation.
//!
//! Vertices are snapped into a regular grid over the bounding box; each
//! occupied cell becomes one vertex at the mean of its members. Faces that
//! collapse or repeat an earlier face are dropped. The grid resolution is
//! chosen by bisection so the face count lands as close below the target
//! as the grid allows.

// Grid coordinates are clamped to the resolution, which fits u32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use hashbrown::HashMap;
use mesh_repair::duplicate_faces;
use mesh_types::{Aabb, Face, IndexedMesh, MeshBounds, Point3, Vector3, Vertex, unique_vertex_count};
use tracing::debug;

use crate::backend::Decimator;
use crate::error::{RetopoError, RetopoResult};

/// Built-in [`Decimator`] based on grid vertex clustering.
///
/// Fast and robust on any polygon soup, but coarser than edge-collapse
/// schemes: features smaller than a grid cell are lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterDecimator {
    /// Finest grid tried, in cells along the longest bounding-box axis.
    pub max_resolution: u32,
}

impl Default for ClusterDecimator {
    fn default() -> Self {
        Self {
            max_resolution: 1024,
        }
    }
}

impl ClusterDecimator {
    /// Decimator with the given finest grid resolution.
    #[must_use]
    pub const fn with_max_resolution(max_resolution: u32) -> Self {
        Self { max_resolution }
    }
}

impl Decimator for ClusterDecimator {
    fn name(&self) -> &str {
        "cluster"
    }

    fn decimate(&self, mesh: &IndexedMesh, target_faces: usize) -> RetopoResult<IndexedMesh> {
        mesh.require_faces()?;
        if mesh.faces.len() <= target_faces {
            return Ok(mesh.clone());
        }

        let bounds = mesh.bounds();
        if bounds.max_extent() <= 0.0 {
            return Err(RetopoError::backend(self.name(), "mesh has no spatial extent"));
        }

        // Finest non-empty grid at or under the target, else the coarsest above it
        let mut under: Option<IndexedMesh> = None;
        let mut over: Option<IndexedMesh> = None;
        let (mut lo, mut hi) = (1_u32, self.max_resolution.max(1));
        while lo <= hi {
            let resolution = lo + (hi - lo) / 2;
            let clustered = cluster(mesh, &bounds, resolution);
            let count = clustered.faces.len();
            debug!(resolution, faces = count, "Clustered");
            if count <= target_faces {
                if count > 0 {
                    under = Some(clustered);
                }
                lo = resolution + 1;
            } else {
                over = Some(clustered);
                hi = resolution - 1;
            }
        }

        under
            .or(over)
            .ok_or_else(|| RetopoError::backend(self.name(), "clustering removed every face"))
    }
}

/// Collapse `mesh` onto a grid with `resolution` cells along its longest axis.
fn cluster(mesh: &IndexedMesh, bounds: &Aabb, resolution: u32) -> IndexedMesh {
    let cell = bounds.max_extent() / f64::from(resolution);
    let last = resolution - 1;
    let cell_of = |p: &Point3<f64>| {
        let rel = (p - bounds.min) / cell;
        let clamp = |c: f64| (c.floor().max(0.0) as u32).min(last);
        (clamp(rel.x), clamp(rel.y), clamp(rel.z))
    };

    let mut cell_index: HashMap<(u32, u32, u32), u32> = HashMap::new();
    let mut sums: Vec<Vector3<f64>> = Vec::new();
    let mut counts: Vec<u32> = Vec::new();
    let mut remap: Vec<Option<u32>> = vec![None; mesh.vertices.len()];

    let mut faces: Vec<Face> = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        let mut mapped = Face::new();
        for &v in face {
            let idx = *remap[v as usize].get_or_insert_with(|| {
                let position = &mesh.vertices[v as usize].position;
                let idx = *cell_index.entry(cell_of(position)).or_insert_with(|| {
                    sums.push(Vector3::zeros());
                    counts.push(0);
                    (sums.len() - 1) as u32
                });
                sums[idx as usize] += position.coords;
                counts[idx as usize] += 1;
                idx
            });
            if mapped.last() != Some(&idx) {
                mapped.push(idx);
            }
        }
        while mapped.len() > 1 && mapped.first() == mapped.last() {
            mapped.pop();
        }
        if mapped.len() >= 3 && unique_vertex_count(&mapped) >= 3 {
            faces.push(mapped);
        }
    }

    let duplicates = duplicate_faces(&faces);
    if !duplicates.is_empty() {
        let mut is_duplicate = vec![false; faces.len()];
        for &f in &duplicates {
            is_duplicate[f] = true;
        }
        faces = faces
            .into_iter()
            .zip(is_duplicate)
            .filter_map(|(face, dup)| (!dup).then_some(face))
            .collect();
    }

    let vertices = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| Vertex::new(Point3::from(sum / f64::from(count))))
        .collect();

    // Cells used only by dropped faces stay as unreferenced vertices
    let (compacted, _) = IndexedMesh::from_parts(vertices, faces).without_unreferenced_vertices();
    compacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    /// Closed UV sphere with `rings` latitude bands and `segments` longitude slices.
    fn uv_sphere(rings: u32, segments: u32) -> IndexedMesh {
        let mut positions = vec![[0.0, 0.0, 1.0]];
        for r in 1..rings {
            let theta = std::f64::consts::PI * f64::from(r) / f64::from(rings);
            for s in 0..segments {
                let phi = std::f64::consts::TAU * f64::from(s) / f64::from(segments);
                positions.push([theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()]);
            }
        }
        positions.push([0.0, 0.0, -1.0]);
        let south = (positions.len() - 1) as u32;
        let ring = |r: u32, s: u32| 1 + (r - 1) * segments + s % segments;

        let mut faces = Vec::new();
        for s in 0..segments {
            faces.push([0, ring(1, s), ring(1, s + 1)]);
            faces.push([south, ring(rings - 1, s + 1), ring(rings - 1, s)]);
        }
        for r in 1..rings - 1 {
            for s in 0..segments {
                let (a, b) = (ring(r, s), ring(r, s + 1));
                let (c, d) = (ring(r + 1, s + 1), ring(r + 1, s));
                faces.push([a, d, c]);
                faces.push([a, c, b]);
            }
        }
        IndexedMesh::from_arrays(&positions, &faces)
    }

    #[test]
    fn under_target_is_returned_unchanged() {
        let cube = unit_cube();
        let result = ClusterDecimator::default().decimate(&cube, 12).unwrap();
        assert_eq!(result, cube);
    }

    #[test]
    fn sphere_is_reduced_below_target() {
        let sphere = uv_sphere(24, 48);
        let target = sphere.faces.len() / 4;
        let result = ClusterDecimator::default().decimate(&sphere, target).unwrap();
        assert!(!result.faces.is_empty());
        assert!(result.faces.len() <= target);
        assert!(result.validate().is_ok());
        // Every vertex stays on or inside the unit sphere
        assert!(result.vertices.iter().all(|v| v.position.coords.norm() <= 1.0 + 1e-9));
    }

    #[test]
    fn tiny_target_falls_back_to_coarsest_nonempty_grid() {
        let result = ClusterDecimator::default().decimate(&unit_cube(), 4).unwrap();
        assert!(!result.faces.is_empty());
        assert!(result.validate().is_ok());
    }

    #[test]
    fn flat_point_mesh_is_rejected() {
        let mesh = IndexedMesh::from_arrays(&[[1.0, 1.0, 1.0]; 3], &[[0, 1, 2], [0, 2, 1]]);
        let err = ClusterDecimator::default().decimate(&mesh, 1).unwrap_err();
        assert!(matches!(err, RetopoError::Backend { .. }));
    }

    #[test]
    fn clustering_merges_shared_cells() {
        let sphere = uv_sphere(8, 16);
        let coarse = cluster(&sphere, &sphere.bounds(), 2);
        assert!(coarse.vertices.len() <= 8);
        assert!(coarse.validate().is_ok());
    }
}
