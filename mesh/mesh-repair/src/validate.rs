//! Mesh analysis and health reporting.
//!
//! [`analyze`] produces a [`MeshReport`]: a read-only snapshot of one mesh
//! version. A report is never updated in place; analyze the new mesh after
//! every operator.

use mesh_types::{IndexedMesh, MeshIndex};
use tracing::debug;

use crate::components::components_in;
use crate::defects::{duplicate_faces, duplicate_vertex_count, is_degenerate, non_manifold_faces_in};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Report of mesh analysis results.
///
/// Contains counts of mesh defects and methods to check overall mesh health.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Total number of distinct edges.
    pub edge_count: usize,

    /// Number of open edges (used by exactly one face).
    pub open_edge_count: usize,
    /// Number of non-manifold edges (used by three or more faces).
    pub non_manifold_edge_count: usize,
    /// Number of faces touching a non-manifold edge.
    pub non_manifold_face_count: usize,
    /// Number of vertices that exactly duplicate an earlier position.
    pub duplicate_vertex_count: usize,
    /// Number of degenerate faces (tiny area or repeated indices).
    pub degenerate_face_count: usize,
    /// Number of faces repeating an earlier face's vertex cycle.
    pub duplicate_face_count: usize,
    /// Number of edge-connected face components.
    pub component_count: usize,

    /// Whether every edge is shared by exactly two faces.
    pub is_watertight: bool,
    /// Whether no edge is shared by more than two faces.
    pub is_manifold: bool,
    /// Whether the signed volume is negative.
    pub is_inside_out: bool,
}

impl MeshReport {
    /// Check if the mesh is ready for 3D printing or simulation.
    ///
    /// Requires a watertight, correctly wound mesh.
    #[must_use]
    pub const fn is_printable(&self) -> bool {
        self.is_watertight && self.is_manifold && !self.is_inside_out
    }

    /// Check if the mesh has any defects.
    #[must_use]
    pub const fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    /// Total number of defects found.
    #[must_use]
    pub const fn issue_count(&self) -> usize {
        self.open_edge_count
            + self.non_manifold_edge_count
            + self.duplicate_vertex_count
            + self.degenerate_face_count
            + self.duplicate_face_count
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };

        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Components: {}", self.component_count)?;
        writeln!(f)?;
        writeln!(f, "  Status:")?;
        writeln!(f, "    Watertight: {}", yes_no(self.is_watertight))?;
        writeln!(f, "    Manifold: {}", yes_no(self.is_manifold))?;
        writeln!(
            f,
            "    Winding: {}",
            if self.is_inside_out { "Inside-out" } else { "Correct" }
        )?;

        if self.has_issues() {
            writeln!(f)?;
            writeln!(f, "  Issues:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(
                    f,
                    "    Non-manifold edges: {} ({} faces)",
                    self.non_manifold_edge_count, self.non_manifold_face_count
                )?;
            }
            if self.duplicate_vertex_count > 0 {
                writeln!(f, "    Duplicate vertices: {}", self.duplicate_vertex_count)?;
            }
            if self.degenerate_face_count > 0 {
                writeln!(f, "    Degenerate faces: {}", self.degenerate_face_count)?;
            }
            if self.duplicate_face_count > 0 {
                writeln!(f, "    Duplicate faces: {}", self.duplicate_face_count)?;
            }
        }

        Ok(())
    }
}

/// Options for mesh analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisOptions {
    /// Area below which a face is degenerate. Default: `1e-12`
    pub degenerate_area_threshold: f64,
    /// Whether to compute the signed volume to detect inside-out meshes.
    pub check_winding: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            degenerate_area_threshold: 1e-12,
            check_winding: true,
        }
    }
}

impl AnalysisOptions {
    /// Set the degenerate area threshold.
    #[must_use]
    pub const fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Enable or disable the inside-out check.
    #[must_use]
    pub const fn with_check_winding(mut self, check: bool) -> Self {
        self.check_winding = check;
        self
    }
}

/// Analyze a mesh with default options.
///
/// Never fails for a structurally valid buffer. An empty mesh yields zeroed
/// counts and `is_watertight == true`.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::analyze;
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0]],
///     &[[0, 1, 2]],
/// );
///
/// let report = analyze(&mesh);
/// assert_eq!(report.face_count, 1);
/// assert_eq!(report.open_edge_count, 3);
/// assert!(!report.is_watertight);
/// ```
#[must_use]
pub fn analyze(mesh: &IndexedMesh) -> MeshReport {
    analyze_with_options(mesh, &AnalysisOptions::default())
}

/// Analyze a mesh with custom options.
#[must_use]
pub fn analyze_with_options(mesh: &IndexedMesh, options: &AnalysisOptions) -> MeshReport {
    let index = MeshIndex::new(mesh);
    let adjacency = index.adjacency();

    let degenerate_face_count = mesh
        .faces
        .iter()
        .filter(|face| is_degenerate(mesh, face, options.degenerate_area_threshold))
        .count();

    let report = MeshReport {
        vertex_count: mesh.vertices.len(),
        face_count: mesh.faces.len(),
        edge_count: adjacency.edge_count(),
        open_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        non_manifold_face_count: non_manifold_faces_in(adjacency).len(),
        duplicate_vertex_count: duplicate_vertex_count(mesh),
        degenerate_face_count,
        duplicate_face_count: duplicate_faces(&mesh.faces).len(),
        component_count: components_in(index.face_neighbors()).len(),
        is_watertight: adjacency.is_watertight(),
        is_manifold: adjacency.is_manifold(),
        is_inside_out: options.check_winding && !mesh.faces.is_empty() && mesh.is_inside_out(),
    };

    debug!(
        vertices = report.vertex_count,
        faces = report.face_count,
        open_edges = report.open_edge_count,
        non_manifold_edges = report.non_manifold_edge_count,
        "Analyzed mesh"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{unit_cube, unit_cube_quads};

    fn tetrahedron() -> IndexedMesh {
        IndexedMesh::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 0.866, 0.0],
                [0.5, 0.289, 0.816],
            ],
            &[[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
    }

    #[test]
    fn analyze_single_triangle() {
        let mesh = IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 0.0]],
            &[[0, 1, 2]],
        );
        let report = analyze(&mesh);

        assert_eq!(report.vertex_count, 3);
        assert_eq!(report.open_edge_count, 3);
        assert_eq!(report.component_count, 1);
        assert!(!report.is_watertight);
        assert!(report.is_manifold);
    }

    #[test]
    fn analyze_tetrahedron() {
        let report = analyze(&tetrahedron());
        assert_eq!(report.open_edge_count, 0);
        assert!(report.is_watertight);
        assert!(report.is_printable());
        assert!(!report.has_issues());
    }

    #[test]
    fn analyze_empty_mesh() {
        let report = analyze(&IndexedMesh::new());
        assert_eq!(report, MeshReport {
            is_watertight: true,
            is_manifold: true,
            ..MeshReport::default()
        });
    }

    #[test]
    fn analyze_quad_cube() {
        let report = analyze(&unit_cube_quads());
        assert_eq!(report.face_count, 6);
        assert_eq!(report.edge_count, 12);
        assert!(report.is_watertight);
    }

    #[test]
    fn detects_inside_out() {
        let mut cube = unit_cube();
        cube.flip_normals();
        let report = analyze(&cube);
        assert!(report.is_inside_out);
        assert!(!report.is_printable());

        let report = analyze_with_options(&cube, &AnalysisOptions::default().with_check_winding(false));
        assert!(!report.is_inside_out);
    }

    #[test]
    fn counts_every_defect_kind() {
        let mut mesh = unit_cube();
        // Duplicate face, fin face on edge (0, 1), a degenerate face, a duplicate vertex
        mesh.faces.push(mesh.faces[0].clone());
        mesh.vertices.push(mesh_types::Vertex::from_coords(0.5, -1.0, 0.5));
        mesh.faces.push([0, 1, 8].into_iter().collect());
        mesh.vertices.push(mesh_types::Vertex::from_coords(1.0, 1.0, 1.0));
        mesh.faces.push([4, 5, 5].into_iter().collect());

        let report = analyze(&mesh);
        assert_eq!(report.duplicate_face_count, 1);
        assert_eq!(report.duplicate_vertex_count, 1);
        assert_eq!(report.degenerate_face_count, 1);
        assert!(report.non_manifold_edge_count >= 1);
        assert!(!report.is_manifold);
        assert!(!report.is_watertight);

        let text = report.to_string();
        assert!(text.contains("Mesh Report:"));
        assert!(text.contains("Duplicate faces: 1"));
    }
}
