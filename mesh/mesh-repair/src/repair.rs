//! Core mesh repair operations.
//!
//! Each operation borrows a mesh and returns a new one together with what
//! it changed. The input is never modified, so a caller can always discard
//! the result and keep its current mesh.

use mesh_types::{IndexedMesh, MeshAdjacency};
use tracing::{debug, info};

use crate::components::{FaceRemoval, retain_faces};
use crate::defects::{duplicate_faces, is_degenerate, non_manifold_faces_in};
use crate::weld::weld_vertices;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for the basic repair pipeline.
///
/// All thresholds are in the same units as the mesh coordinates.
///
/// # Example
///
/// ```
/// use mesh_repair::RepairParams;
///
/// let params = RepairParams::for_scans().with_weld_epsilon(0.05);
/// assert_eq!(params.weld_epsilon, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RepairParams {
    /// Distance threshold for vertex welding. Default: `1e-6`
    pub weld_epsilon: f64,

    /// Faces with area below this are removed. Default: `1e-12`
    pub degenerate_area_threshold: f64,

    /// Whether to drop faces touching non-manifold edges. Default: `false`
    pub remove_non_manifold: bool,

    /// Whether to remove every unreferenced vertex at the end. Default: `true`
    pub remove_unreferenced: bool,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            weld_epsilon: 1e-6,
            degenerate_area_threshold: 1e-12,
            remove_non_manifold: false,
            remove_unreferenced: true,
        }
    }
}

impl RepairParams {
    /// Params for 3D scan data: aggressive welding and cleanup.
    #[must_use]
    pub fn for_scans() -> Self {
        Self {
            weld_epsilon: 0.01,
            degenerate_area_threshold: 1e-4,
            remove_non_manifold: true,
            ..Default::default()
        }
    }

    /// Params for CAD models: conservative, exact-coincidence welding only.
    #[must_use]
    pub fn for_cad() -> Self {
        Self {
            weld_epsilon: 1e-9,
            degenerate_area_threshold: 1e-15,
            ..Default::default()
        }
    }

    /// Params for 3D printing preparation.
    #[must_use]
    pub fn for_printing() -> Self {
        Self {
            weld_epsilon: 1e-3,
            degenerate_area_threshold: 1e-5,
            remove_non_manifold: true,
            ..Default::default()
        }
    }

    /// Set the vertex welding distance threshold.
    #[must_use]
    pub const fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = epsilon;
        self
    }

    /// Set the degenerate face area threshold.
    #[must_use]
    pub const fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Set whether to drop non-manifold faces.
    #[must_use]
    pub const fn with_remove_non_manifold(mut self, remove: bool) -> Self {
        self.remove_non_manifold = remove;
        self
    }

    /// Set whether to remove unreferenced vertices after repair.
    #[must_use]
    pub const fn with_remove_unreferenced(mut self, remove: bool) -> Self {
        self.remove_unreferenced = remove;
        self
    }
}

/// Remove faces with area below `epsilon` or fewer than three distinct
/// vertices, then compact vertices that lost their last face.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::remove_degenerate_faces;
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [5.0, 0.0, 0.0], [0.0, 10.0, 0.0]],
///     &[[0, 1, 2], [0, 1, 3]],
/// );
///
/// let result = remove_degenerate_faces(&mesh, 1e-3);
/// assert_eq!(result.faces_removed, 1);
/// assert_eq!(result.vertices_removed, 1);
/// ```
#[must_use]
pub fn remove_degenerate_faces(mesh: &IndexedMesh, epsilon: f64) -> FaceRemoval {
    let keep: Vec<bool> = mesh
        .faces
        .iter()
        .map(|face| !is_degenerate(mesh, face, epsilon))
        .collect();
    let result = retain_faces(mesh, &keep);
    debug!(removed = result.faces_removed, epsilon, "Removed degenerate faces");
    result
}

/// Remove every face that touches an edge shared by three or more faces.
///
/// Returns the input unchanged when no face is flagged. Afterwards no edge
/// has more than two faces.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, Face, Vertex};
/// use mesh_repair::{remove_non_manifold_faces, non_manifold_faces};
///
/// let mut mesh = unit_cube();
/// mesh.vertices.push(Vertex::from_coords(0.5, -1.0, 0.0));
/// mesh.faces.push(Face::from_slice(&[0, 1, 8]));
///
/// let result = remove_non_manifold_faces(&mesh);
/// assert_eq!(result.faces_removed, 3);
/// assert!(non_manifold_faces(&result.mesh).is_empty());
/// ```
#[must_use]
pub fn remove_non_manifold_faces(mesh: &IndexedMesh) -> FaceRemoval {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let flagged = non_manifold_faces_in(&adjacency);
    if flagged.is_empty() {
        return FaceRemoval::unchanged(mesh);
    }

    let mut keep = vec![true; mesh.faces.len()];
    for face in flagged {
        keep[face] = false;
    }
    let result = retain_faces(mesh, &keep);
    info!("Removed {} non-manifold faces", result.faces_removed);
    result
}

/// Remove faces that repeat an earlier face's vertex cycle in either winding.
#[must_use]
pub fn remove_duplicate_faces(mesh: &IndexedMesh) -> FaceRemoval {
    let duplicates = duplicate_faces(&mesh.faces);
    if duplicates.is_empty() {
        return FaceRemoval::unchanged(mesh);
    }
    let mut keep = vec![true; mesh.faces.len()];
    for face in duplicates {
        keep[face] = false;
    }
    retain_faces(mesh, &keep)
}

/// Remove vertices no face references and compact indices.
///
/// Returns the new mesh and the number of vertices removed.
#[must_use]
pub fn remove_unreferenced_vertices(mesh: &IndexedMesh) -> (IndexedMesh, usize) {
    mesh.without_unreferenced_vertices()
}

/// Run the basic repair pipeline.
///
/// This performs:
/// 1. Remove degenerate faces
/// 2. Weld nearby vertices
/// 3. Remove duplicate faces
/// 4. Remove non-manifold faces (if enabled)
/// 5. Remove unreferenced vertices (if enabled)
///
/// It does not fill holes; see [`repair_to_manifold`](crate::repair_to_manifold).
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::{repair_mesh, RepairParams};
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [10.0, 0.0, 0.0]],
///     &[[0, 1, 2], [2, 3, 0]],
/// );
///
/// let (repaired, summary) = repair_mesh(&mesh, &RepairParams::default());
/// assert_eq!(summary.vertices_welded, 1);
/// assert_eq!(summary.duplicates_removed, 1);
/// assert_eq!(repaired.faces.len(), 1);
/// ```
#[must_use]
pub fn repair_mesh(mesh: &IndexedMesh, params: &RepairParams) -> (IndexedMesh, RepairSummary) {
    let degenerate = remove_degenerate_faces(mesh, params.degenerate_area_threshold);
    let welded = weld_vertices(&degenerate.mesh, params.weld_epsilon);
    let deduped = remove_duplicate_faces(&welded.mesh);

    let non_manifold = if params.remove_non_manifold {
        remove_non_manifold_faces(&deduped.mesh)
    } else {
        FaceRemoval::unchanged(&deduped.mesh)
    };

    let (repaired, unreferenced_removed) = if params.remove_unreferenced {
        remove_unreferenced_vertices(&non_manifold.mesh)
    } else {
        (non_manifold.mesh, 0)
    };

    let summary = RepairSummary {
        initial_vertices: mesh.vertices.len(),
        initial_faces: mesh.faces.len(),
        final_vertices: repaired.vertices.len(),
        final_faces: repaired.faces.len(),
        vertices_welded: welded.vertices_merged,
        degenerates_removed: degenerate.faces_removed + welded.faces_collapsed,
        duplicates_removed: deduped.faces_removed,
        non_manifold_removed: non_manifold.faces_removed,
        unreferenced_removed,
    };
    info!("{summary}");

    (repaired, summary)
}

/// Summary of a [`repair_mesh`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepairSummary {
    /// Number of vertices before repair.
    pub initial_vertices: usize,
    /// Number of faces before repair.
    pub initial_faces: usize,
    /// Number of vertices after repair.
    pub final_vertices: usize,
    /// Number of faces after repair.
    pub final_faces: usize,
    /// Number of vertices merged by welding.
    pub vertices_welded: usize,
    /// Number of degenerate faces removed, including faces collapsed by welding.
    pub degenerates_removed: usize,
    /// Number of duplicate faces removed.
    pub duplicates_removed: usize,
    /// Number of non-manifold faces removed.
    pub non_manifold_removed: usize,
    /// Number of unreferenced vertices removed.
    pub unreferenced_removed: usize,
}

impl RepairSummary {
    /// Check if any repairs were performed.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.vertices_welded > 0
            || self.degenerates_removed > 0
            || self.duplicates_removed > 0
            || self.non_manifold_removed > 0
            || self.unreferenced_removed > 0
    }
}

impl std::fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repair: {} verts ({} welded, {} unreferenced), {} faces ({} degenerate, {} duplicate, {} non-manifold)",
            self.final_vertices,
            self.vertices_welded,
            self.unreferenced_removed,
            self.final_faces,
            self.degenerates_removed,
            self.duplicates_removed,
            self.non_manifold_removed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Face, Vertex, unit_cube};

    fn simple_mesh() -> IndexedMesh {
        IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0]],
            &[[0, 1, 2]],
        )
    }

    #[test]
    fn remove_degenerate_collinear() {
        let mesh = IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [5.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
            &[[0, 1, 2]],
        );
        let result = remove_degenerate_faces(&mesh, 1e-12);
        assert_eq!(result.faces_removed, 1);
        assert!(result.mesh.faces.is_empty());
        assert!(result.mesh.vertices.is_empty());
        // Input untouched
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn remove_degenerate_keeps_valid() {
        let mesh = simple_mesh();
        let result = remove_degenerate_faces(&mesh, 1e-12);
        assert_eq!(result.faces_removed, 0);
        assert_eq!(result.mesh, mesh);
    }

    #[test]
    fn non_manifold_removal_is_noop_on_clean_mesh() {
        let cube = unit_cube();
        let result = remove_non_manifold_faces(&cube);
        assert_eq!(result.faces_removed, 0);
        assert_eq!(result.mesh, cube);
    }

    #[test]
    fn non_manifold_removal_compacts_vertices() {
        let mut mesh = unit_cube();
        mesh.vertices.push(Vertex::from_coords(0.5, -1.0, 0.0));
        mesh.faces.push(Face::from_slice(&[0, 1, 8]));

        let result = remove_non_manifold_faces(&mesh);
        // Fin plus the two cube faces on edge (0, 1)
        assert_eq!(result.faces_removed, 3);
        assert_eq!(result.mesh.faces.len(), 10);
        assert_eq!(result.vertices_removed, 1);
        assert!(MeshAdjacency::build(&result.mesh.faces).is_manifold());
    }

    #[test]
    fn remove_duplicate_reversed() {
        let mut mesh = simple_mesh();
        mesh.faces.push(Face::from_slice(&[0, 2, 1]));
        let result = remove_duplicate_faces(&mesh);
        assert_eq!(result.faces_removed, 1);
        assert_eq!(result.mesh.faces.len(), 1);
    }

    #[test]
    fn remove_unreferenced() {
        let mut mesh = simple_mesh();
        mesh.vertices.push(Vertex::from_coords(100.0, 100.0, 100.0));
        let (compact, removed) = remove_unreferenced_vertices(&mesh);
        assert_eq!(removed, 1);
        assert_eq!(compact.vertices.len(), 3);
    }

    #[test]
    fn params_presets() {
        let params = RepairParams::default();
        assert!((params.weld_epsilon - 1e-6).abs() < f64::EPSILON);
        assert!(params.remove_unreferenced);
        assert!(!params.remove_non_manifold);

        assert!(RepairParams::for_scans().weld_epsilon > params.weld_epsilon);
        assert!(RepairParams::for_cad().weld_epsilon < params.weld_epsilon);
        assert!(RepairParams::for_printing().remove_non_manifold);

        let params = RepairParams::default()
            .with_weld_epsilon(0.5)
            .with_degenerate_area_threshold(0.1)
            .with_remove_non_manifold(true)
            .with_remove_unreferenced(false);
        assert!((params.weld_epsilon - 0.5).abs() < f64::EPSILON);
        assert!((params.degenerate_area_threshold - 0.1).abs() < f64::EPSILON);
        assert!(params.remove_non_manifold);
        assert!(!params.remove_unreferenced);
    }

    #[test]
    fn full_pipeline() {
        let mut mesh = unit_cube();
        // Split vertex 6 into a near-duplicate used by one face
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 1.0 + 1e-9));
        mesh.faces[2] = Face::from_slice(&[4, 5, 8]);
        // Duplicate face and a degenerate sliver
        mesh.faces.push(mesh.faces[0].clone());
        mesh.faces.push(Face::from_slice(&[0, 1, 1]));
        // Unreferenced vertex
        mesh.vertices.push(Vertex::from_coords(50.0, 50.0, 50.0));

        let (repaired, summary) = repair_mesh(&mesh, &RepairParams::default());
        assert_eq!(summary.vertices_welded, 1);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(summary.degenerates_removed, 1);
        assert_eq!(summary.unreferenced_removed, 1);
        assert!(summary.had_changes());
        assert_eq!(repaired.faces.len(), 12);
        assert_eq!(repaired.vertices.len(), 8);
        assert!(MeshAdjacency::build(&repaired.faces).is_watertight());
    }

    #[test]
    fn summary_display() {
        let (_, summary) = repair_mesh(&simple_mesh(), &RepairParams::default());
        assert!(!summary.had_changes());
        let text = summary.to_string();
        assert!(text.contains("3 verts"));
        assert!(text.contains("1 faces"));
    }
}
