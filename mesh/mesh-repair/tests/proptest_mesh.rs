//! Property-based tests for mesh analysis and repair.
//!
//! These tests use proptest to generate random meshes and verify invariants.
//!
//! Run with: cargo test -p mesh-repair -- proptest

use mesh_repair::{
    HoleFillRepairer, RepairParams, analyze, is_watertight, non_manifold_faces, open_edges,
    repair_mesh, repair_to_manifold, weld_vertices,
};
use mesh_types::{Face, IndexedMesh, Vertex, unit_cube, unit_cube_quads};
use proptest::prelude::*;

// =============================================================================
// Strategies for generating random meshes
// =============================================================================

/// Generate a random vertex position in a bounded range.
fn arb_position() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-100.0..100.0f64)
}

/// Generate a random vertex with position only.
fn arb_vertex() -> impl Strategy<Value = Vertex> {
    arb_position().prop_map(|[x, y, z]| Vertex::from_coords(x, y, z))
}

/// Generate a mesh with in-range triangle indices (repeats allowed).
fn arb_mesh(
    min_vertices: usize,
    max_vertices: usize,
    min_faces: usize,
    max_faces: usize,
) -> impl Strategy<Value = IndexedMesh> {
    (min_vertices..=max_vertices).prop_flat_map(move |num_vertices| {
        let vertices = prop::collection::vec(arb_vertex(), num_vertices);

        vertices.prop_flat_map(move |verts| {
            let n = verts.len() as u32;
            let face = prop::array::uniform3(0..n).prop_map(|f| Face::from_slice(&f));
            let faces = prop::collection::vec(face, min_faces..=max_faces);

            faces.prop_map(move |faces| IndexedMesh {
                vertices: verts.clone(),
                faces,
            })
        })
    })
}

/// A unit cube with between one and three of its twelve triangles removed.
fn arb_punctured_cube() -> impl Strategy<Value = IndexedMesh> {
    prop::sample::subsequence((0..12).collect::<Vec<usize>>(), 1..=3).prop_map(|removed| {
        let cube = unit_cube();
        let faces = cube
            .faces
            .iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, face)| face.clone())
            .collect();
        IndexedMesh {
            vertices: cube.vertices,
            faces,
        }
    })
}

// =============================================================================
// Property Tests: Analysis
// =============================================================================

proptest! {
    /// Analysis should never panic on any in-range mesh.
    #[test]
    fn analysis_never_panics(mesh in arb_mesh(3, 50, 0, 100)) {
        let _ = analyze(&mesh);
    }

    /// Analysis is a pure function of the buffers.
    #[test]
    fn analysis_is_idempotent(mesh in arb_mesh(3, 30, 1, 50)) {
        prop_assert_eq!(analyze(&mesh), analyze(&mesh));
    }

    /// On meshes without non-manifold edges, watertight is exactly "no open edges".
    #[test]
    fn watertight_iff_no_open_edges(mesh in arb_mesh(3, 12, 0, 16)) {
        if non_manifold_faces(&mesh).is_empty() {
            prop_assert_eq!(is_watertight(&mesh), open_edges(&mesh).is_empty());
        } else {
            prop_assert!(!is_watertight(&mesh));
        }
    }

    /// Report counts agree with the individual queries.
    #[test]
    fn report_matches_queries(mesh in arb_mesh(3, 20, 1, 30)) {
        let report = analyze(&mesh);
        prop_assert_eq!(report.open_edge_count, open_edges(&mesh).len());
        prop_assert_eq!(report.non_manifold_face_count, non_manifold_faces(&mesh).len());
        prop_assert_eq!(report.is_watertight, is_watertight(&mesh));
    }
}

// =============================================================================
// Property Tests: Vertex Welding
// =============================================================================

proptest! {
    /// Welding with a zero threshold is the identity.
    #[test]
    fn weld_zero_is_identity(mesh in arb_mesh(3, 30, 1, 50)) {
        let result = weld_vertices(&mesh, 0.0);
        prop_assert_eq!(result.vertices_merged, 0);
        prop_assert_eq!(result.mesh, mesh);
    }

    /// Welding should never increase vertex or face count.
    #[test]
    fn weld_never_grows(mesh in arb_mesh(3, 30, 1, 50)) {
        let result = weld_vertices(&mesh, 5.0);
        prop_assert!(result.mesh.vertices.len() <= mesh.vertices.len());
        prop_assert!(result.mesh.faces.len() <= mesh.faces.len());
    }

    /// All face indices should be valid after welding.
    #[test]
    fn weld_produces_valid_indices(mesh in arb_mesh(3, 30, 1, 50)) {
        let result = weld_vertices(&mesh, 10.0);
        prop_assert!(result.mesh.validate().is_ok());
    }

    /// Surviving vertices are farther apart than the threshold, so a second
    /// weld finds nothing.
    #[test]
    fn weld_is_idempotent(mesh in arb_mesh(3, 30, 1, 50)) {
        let first = weld_vertices(&mesh, 10.0);
        let second = weld_vertices(&first.mesh, 10.0);
        prop_assert_eq!(second.vertices_merged, 0);
        prop_assert_eq!(second.mesh, first.mesh);
    }
}

// =============================================================================
// Property Tests: Repair
// =============================================================================

proptest! {
    /// Basic repair should never panic and never add faces.
    #[test]
    fn repair_never_grows(mesh in arb_mesh(3, 30, 1, 50)) {
        let (repaired, summary) = repair_mesh(&mesh, &RepairParams::default());
        prop_assert!(repaired.faces.len() <= mesh.faces.len());
        prop_assert_eq!(summary.final_faces, repaired.faces.len());
        prop_assert!(repaired.validate().is_ok());
    }

    /// Closing converges: once repaired, a second repair finds nothing to do.
    #[test]
    fn manifold_repair_converges(mesh in arb_punctured_cube()) {
        let repairer = HoleFillRepairer::default();
        let once = repair_to_manifold(&mesh, &repairer).unwrap();
        prop_assert!(once.is_clean());
        prop_assert!(is_watertight(&once.mesh));

        let twice = repair_to_manifold(&once.mesh, &repairer).unwrap();
        prop_assert!(twice.was_watertight);
        prop_assert!(is_watertight(&twice.mesh));
        prop_assert_eq!(twice.mesh, once.mesh);
    }

    /// Any soup with faces comes back with faces, and a second repair either
    /// yields a closed surface or says why it could not.
    #[test]
    fn manifold_repair_twice_on_soups(mesh in arb_mesh(3, 30, 1, 50)) {
        let repairer = HoleFillRepairer::default();
        let once = repair_to_manifold(&mesh, &repairer).unwrap();
        prop_assert!(!once.mesh.faces.is_empty());
        prop_assert!(once.mesh.validate().is_ok());
        prop_assert!(is_watertight(&once.mesh) || once.warning.is_some());

        let twice = repair_to_manifold(&once.mesh, &repairer);
        prop_assert!(twice.is_ok());
        let twice = twice.unwrap();
        prop_assert!(!twice.mesh.faces.is_empty());
        prop_assert!(is_watertight(&twice.mesh) || twice.warning.is_some());
    }
}

// =============================================================================
// Cube scenarios
// =============================================================================

#[test]
fn cube_is_clean() {
    let report = analyze(&unit_cube());
    assert_eq!(report.vertex_count, 8);
    assert_eq!(report.face_count, 12);
    assert!(report.is_printable());
    assert!(!report.has_issues());
}

#[test]
fn cube_missing_one_side() {
    let mut mesh = unit_cube_quads();
    mesh.faces.remove(1);

    let open = open_edges(&mesh);
    assert_eq!(open.len(), 4);
    assert!(!is_watertight(&mesh));

    let result = repair_to_manifold(&mesh, &HoleFillRepairer::default()).unwrap();
    assert!(is_watertight(&result.mesh));
    assert!(result.mesh.faces.len() >= 6);
}

#[test]
fn duplicate_corner_is_counted_and_welded() {
    let mut mesh = unit_cube();
    // Vertex 7 moved onto vertex 3's position
    mesh.vertices[7] = mesh.vertices[3].clone();
    assert_eq!(analyze(&mesh).duplicate_vertex_count, 1);

    let result = weld_vertices(&mesh, 1e-6);
    assert_eq!(result.mesh.vertices.len(), mesh.vertices.len() - 1);
    // Top triangle [4, 6, 7] now uses the lower index
    assert_eq!(result.mesh.faces[3].as_slice(), &[4, 6, 3]);
    // Back and left triangles spanning 3-7 collapsed
    assert_eq!(result.faces_collapsed, 2);
}

#[test]
fn fin_and_collinear_triangle_survive_repair() {
    let fin = IndexedMesh::from_arrays(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 1.0, 0.0],
            [0.5, -1.0, 0.0],
            [0.5, 0.0, 1.0],
        ],
        &[[0, 1, 2], [1, 0, 3], [0, 1, 4]],
    );
    let collinear =
        IndexedMesh::from_arrays(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]], &[[0, 1, 2]]);

    let repairer = HoleFillRepairer::default();
    for mesh in [fin, collinear] {
        let once = repair_to_manifold(&mesh, &repairer).unwrap();
        assert!(!once.is_clean());
        assert_eq!(once.mesh.faces.len(), mesh.faces.len());

        let twice = repair_to_manifold(&once.mesh, &repairer).unwrap();
        assert!(!twice.is_clean());
        assert_eq!(twice.mesh, mesh);
    }
}

#[test]
fn cube_repair_is_stable() {
    let cube = unit_cube();
    let (repaired, summary) = repair_mesh(&cube, &RepairParams::default());
    assert!(!summary.had_changes());
    assert_eq!(repaired, cube);
}
