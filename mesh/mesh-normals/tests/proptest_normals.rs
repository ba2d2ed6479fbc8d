//! Property-based tests for normal computation and auto-smooth.
//!
//! Run with: cargo test -p mesh-normals -- proptest

use mesh_normals::{
    AutoSmoothParams, NormalWeighting, auto_smooth, classify_edges, smooth_shade, transfer_normals,
    vertex_normals,
};
use mesh_types::{Face, IndexedMesh, Vertex, unit_cube};
use proptest::prelude::*;

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(|[x, y, z]| Vertex::from_coords(x, y, z))
}

/// Random triangle soup with in-range indices.
fn arb_mesh() -> impl Strategy<Value = IndexedMesh> {
    (3usize..=12).prop_flat_map(|num_vertices| {
        prop::collection::vec(arb_vertex(), num_vertices).prop_flat_map(move |verts| {
            let n = verts.len() as u32;
            let face = prop::array::uniform3(0..n).prop_map(|f| Face::from_slice(&f));
            prop::collection::vec(face, 1..=16).prop_map(move |faces| IndexedMesh {
                vertices: verts.clone(),
                faces,
            })
        })
    })
}

fn is_unit_or_zero(n: &mesh_types::Vector3<f64>) -> bool {
    let len = n.norm();
    len == 0.0 || (len - 1.0).abs() < 1e-9
}

proptest! {
    #[test]
    fn proptest_vertex_normals_are_unit_or_zero(mesh in arb_mesh()) {
        for weighting in [NormalWeighting::Uniform, NormalWeighting::Area] {
            let normals = vertex_normals(&mesh, weighting);
            prop_assert_eq!(normals.normals.len(), mesh.vertices.len());
            prop_assert!(normals.normals.iter().all(is_unit_or_zero));
        }
    }

    #[test]
    fn proptest_auto_smooth_preserves_face_structure(
        mesh in arb_mesh(),
        angle in 0.0..180.0f64,
    ) {
        let result = auto_smooth(&mesh, &AutoSmoothParams::with_angle(angle)).unwrap();
        let out = &result.mesh;

        prop_assert_eq!(out.faces.len(), mesh.faces.len());
        prop_assert_eq!(out.vertices.len(), result.source_vertex.len());
        prop_assert_eq!(out.vertices.len(), mesh.vertices.len() + result.vertices_split);
        prop_assert!(out.validate().is_ok());

        // Every output face maps back onto its input face
        for (before, after) in mesh.faces.iter().zip(&out.faces) {
            let mapped: Vec<u32> = after.iter().map(|&v| result.source_vertex[v as usize]).collect();
            prop_assert_eq!(mapped.as_slice(), before.as_slice());
        }
        for (v, &src) in result.source_vertex.iter().enumerate() {
            prop_assert_eq!(out.vertices[v].position, mesh.vertices[src as usize].position);
        }
        for face in &out.faces {
            for &v in face {
                let n = out.vertices[v as usize].normal;
                prop_assert!(n.is_some_and(|n| is_unit_or_zero(&n)));
            }
        }
    }

    #[test]
    fn proptest_hard_edges_grow_as_threshold_drops(
        mesh in arb_mesh(),
        low in 0.0..90.0f64,
        delta in 0.0..90.0f64,
    ) {
        let loose = classify_edges(&mesh, low).unwrap();
        let strict = classify_edges(&mesh, low + delta).unwrap();
        prop_assert!(loose.hard_edge_count() >= strict.hard_edge_count());
    }

    #[test]
    fn proptest_closed_smooth_cube_keeps_vertices(
        offset in prop::array::uniform3(-50.0..50.0f64),
        scale in 0.1..10.0f64,
    ) {
        let mut cube = unit_cube();
        for v in &mut cube.vertices {
            v.position.coords *= scale;
            v.position.x += offset[0];
            v.position.y += offset[1];
            v.position.z += offset[2];
        }
        let result = auto_smooth(&cube, &AutoSmoothParams::with_angle(91.0)).unwrap();
        prop_assert_eq!(result.vertices_split, 0);

        let shaded = smooth_shade(&cube).unwrap();
        for (a, b) in result.mesh.vertices.iter().zip(&shaded.mesh.vertices) {
            let (a, b) = (a.normal.unwrap(), b.normal.unwrap());
            prop_assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn proptest_transfer_keeps_target_topology(target in arb_mesh()) {
        let result = transfer_normals(&unit_cube(), &target).unwrap();
        prop_assert_eq!(&result.mesh.faces, &target.faces);
        prop_assert!(result.mesh.vertices.iter().all(|v| v.normal.is_some()));
    }
}
