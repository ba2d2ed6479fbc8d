//! API regression tests for the mesh crate family.
//!
//! These tests pin the public API and the documented behaviour of each
//! layer. They are organized in tiers of increasing scope:
//!
//! - Tier 1: Foundation (mesh-types, adjacency, validation)
//! - Tier 2: Analysis & Repair (mesh-repair)
//! - Tier 3: Shading & Topology (mesh-normals, mesh-topology, mesh-shell, mesh-subdivide)
//! - Tier 4: Orchestration (session, pipeline config, file I/O)
//!
//! A failure here after an API change is a breaking change.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use mesh::prelude::*;
use mesh::{normals, repair, shell, topology, types};

/// Unit cube with its last side (two triangles) removed.
fn open_cube() -> IndexedMesh {
    let mut cube = types::unit_cube();
    cube.faces.truncate(10);
    cube
}

/// Two coplanar triangles sharing the edge 1-2.
fn flat_pair() -> IndexedMesh {
    IndexedMesh::from_arrays(
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        &[[0, 1, 2], [1, 3, 2]],
    )
}

// =============================================================================
// TIER 1: Foundation
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn vertex_creation_and_access() {
        let v = types::Vertex::from_coords(1.0, 2.0, 3.0);
        assert!((v.position.x - 1.0).abs() < f64::EPSILON);
        assert!(v.normal.is_none());

        let v2 = types::Vertex::new(types::Point3::new(4.0, 5.0, 6.0));
        assert!((v2.position.x - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn polygon_faces_are_first_class() {
        let quads = types::unit_cube_quads();
        assert_eq!(quads.face_count(), 6);
        assert!(quads.faces.iter().all(|f| f.len() == 4));
        assert!(!quads.is_triangulated());
        approx::assert_relative_eq!(quads.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn adjacency_counts_edges_once() {
        let adjacency = types::MeshAdjacency::build(&types::unit_cube().faces);
        assert_eq!(adjacency.edges().count(), 18);
        assert!(adjacency.is_watertight());
        assert!(adjacency.is_manifold());

        let open = types::MeshAdjacency::build(&open_cube().faces);
        assert_eq!(open.boundary_edge_count(), 4);
    }

    #[test]
    fn validation_rejects_bad_indices() {
        let mesh = IndexedMesh::from_arrays(&[[0.0, 0.0, 0.0]], &[[0, 1, 2]]);
        assert!(matches!(
            mesh.validate(),
            Err(types::MeshError::IndexOutOfRange { .. })
        ));
    }
}

// =============================================================================
// TIER 2: Analysis & Repair
// =============================================================================

mod tier2_analysis_repair {
    use super::*;

    #[test]
    fn empty_mesh_is_vacuously_watertight() {
        let report = analyze(&IndexedMesh::new());
        assert!(report.is_watertight);
        assert_eq!(report.open_edge_count, 0);
        assert_eq!(report.face_count, 0);
    }

    #[test]
    fn open_cube_is_detected_and_closed() {
        let mesh = open_cube();
        assert_eq!(repair::open_edges(&mesh).len(), 4);
        assert!(!repair::is_watertight(&mesh));

        let result = repair::repair_to_manifold(&mesh, &repair::HoleFillRepairer::default()).unwrap();
        assert!(result.is_clean());
        assert!(repair::is_watertight(&result.mesh));
        assert!(result.mesh.face_count() >= 12);

        // Closed meshes pass through untouched
        let again = repair::repair_to_manifold(&result.mesh, &repair::HoleFillRepairer::default())
            .unwrap();
        assert!(again.was_watertight);
        assert_eq!(again.mesh, result.mesh);
    }

    #[test]
    fn coincident_vertices_weld_to_lower_index() {
        let mesh = IndexedMesh::from_arrays(
            &[
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 0.0, 0.0],
            ],
            &[[0, 1, 3], [0, 2, 7], [1, 6, 7], [4, 5, 6]],
        );
        assert_eq!(repair::duplicate_vertex_count(&mesh), 1);

        let welded = repair::weld_vertices(&mesh, 1e-6);
        assert_eq!(welded.mesh.vertex_count(), 7);
        assert_eq!(welded.mesh.faces[1].as_slice(), &[0, 2, 3]);
        assert_eq!(welded.mesh.faces[2].as_slice(), &[1, 6, 3]);
    }

    #[test]
    fn zero_threshold_weld_is_identity() {
        let mesh = open_cube();
        assert_eq!(repair::weld_vertices(&mesh, 0.0).mesh, mesh);
    }

    #[test]
    fn repair_presets_exist() {
        let scans = repair::RepairParams::for_scans();
        let cad = repair::RepairParams::for_cad();
        assert!(scans.weld_epsilon > cad.weld_epsilon);
        let _ = repair::RepairParams::for_printing();
    }
}

// =============================================================================
// TIER 3: Shading & Topology
// =============================================================================

mod tier3_shading_topology {
    use super::*;

    #[test]
    fn hard_edge_threshold_is_inclusive() {
        let smooth = normals::auto_smooth(&flat_pair(), &normals::AutoSmoothParams::with_angle(30.0))
            .unwrap();
        assert_eq!(smooth.vertices_split, 0);

        let hard = normals::auto_smooth(&flat_pair(), &normals::AutoSmoothParams::with_angle(0.0))
            .unwrap();
        assert_eq!(hard.hard_edges, 1);
        assert_eq!(hard.mesh.vertex_count(), 6);
    }

    #[test]
    fn triangulate_reports_noop() {
        let cube = types::unit_cube();
        assert!(topology::triangulate(&cube).unwrap().was_noop);

        let split = topology::triangulate(&types::unit_cube_quads()).unwrap();
        assert!(!split.was_noop);
        assert_eq!(split.mesh.face_count(), 12);
    }

    #[test]
    fn quadrangulate_is_all_or_nothing() {
        let quads = topology::quadrangulate(&types::unit_cube()).unwrap();
        assert_eq!(quads.quads, 6);

        let mut odd = open_cube();
        odd.faces.pop();
        let err = topology::quadrangulate(&odd).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn solidify_triangle_is_closed() {
        let triangle = IndexedMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        );
        let result = shell::solidify(&triangle, &shell::SolidifyParams::with_thickness(1.0)).unwrap();
        assert_eq!(result.mesh.face_count(), 5);
        assert!(result.is_closed());

        let err = shell::solidify(&triangle, &shell::SolidifyParams::with_thickness(0.0)).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn subdivide_counts() {
        let result = mesh::subdivide::subdivide_mesh(
            &types::unit_cube_quads(),
            &mesh::subdivide::SubdivideParams::default(),
        )
        .unwrap();
        assert_eq!(result.final_faces, 24);
        assert_eq!(result.final_vertices, 26);
    }
}

// =============================================================================
// TIER 4: Orchestration
// =============================================================================

mod tier4_orchestration {
    use super::*;

    #[test]
    fn session_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("open.stl");
        save_mesh(&open_cube(), &input).unwrap();

        let mut session = MeshSession::new();
        let report = session.load_file(&input).unwrap();
        assert_eq!(report.open_edge_count, 4);

        let err = session.save_working(dir.path().join("out.stl")).unwrap_err();
        assert!(err.is_precondition());

        session.apply(&Operation::Repair).unwrap();
        let output = dir.path().join("closed.obj");
        session.save_working(&output).unwrap();

        let closed = load_mesh(&output).unwrap();
        assert!(analyze(&closed).is_watertight);
    }

    #[test]
    fn config_drives_a_pipeline() {
        let config = PipelineConfig::from_toml_str(
            r#"
[[operations]]
op = "repair"

[[operations]]
op = "subdivide"
iterations = 2

[[operations]]
op = "simplify"
factor = 0.5

[[operations]]
op = "smooth_shade"
"#,
        )
        .unwrap();

        let mut session = MeshSession::from_config(&config);
        session.load(types::unit_cube()).unwrap();
        let reports = session.run_pipeline(&config.operations).unwrap();

        assert_eq!(reports.len(), 4);
        // 12 triangles → 36 quads → 144 quads
        assert_eq!(reports[1].faces_after, 144);
        assert!(reports[2].faces_after < reports[2].faces_before);
        let working = session.working().unwrap();
        assert!(working.vertices.iter().all(|v| v.normal.is_some()));
    }

    #[test]
    fn io_format_detection() {
        assert_eq!(MeshFormat::from_path("part.STL"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("part.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("part.ply"), None);
    }
}
