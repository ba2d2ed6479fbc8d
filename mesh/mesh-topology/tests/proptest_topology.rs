//! Property-based tests for topology operators.
//!
//! Run with: cargo test -p mesh-topology -- proptest

use mesh_topology::{TopologyError, edge_split, is_triangulated, quadrangulate, triangulate};
use mesh_types::{Face, IndexedMesh, Vertex, unit_cube};
use proptest::prelude::*;

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(|[x, y, z]| Vertex::from_coords(x, y, z))
}

/// Random polygon soup with faces of three to six in-range indices.
fn arb_polygon_mesh() -> impl Strategy<Value = IndexedMesh> {
    (3usize..=10).prop_flat_map(|num_vertices| {
        prop::collection::vec(arb_vertex(), num_vertices).prop_flat_map(move |verts| {
            let n = verts.len() as u32;
            let face = prop::collection::vec(0..n, 3..=6).prop_map(Face::from_vec);
            prop::collection::vec(face, 1..=12).prop_map(move |faces| IndexedMesh {
                vertices: verts.clone(),
                faces,
            })
        })
    })
}

/// A grid of `w` by `h` unit squares, each split into two triangles.
fn triangulated_grid(w: u32, h: u32) -> IndexedMesh {
    let mut positions = Vec::new();
    for y in 0..=h {
        for x in 0..=w {
            positions.push([f64::from(x), f64::from(y), 0.0]);
        }
    }
    let mut faces = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let a = y * (w + 1) + x;
            let (b, c, d) = (a + 1, a + w + 2, a + w + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    IndexedMesh::from_arrays(&positions, &faces)
}

proptest! {
    #[test]
    fn proptest_triangulate_is_idempotent(mesh in arb_polygon_mesh()) {
        let once = triangulate(&mesh).unwrap();
        prop_assert!(is_triangulated(&once.mesh));
        let twice = triangulate(&once.mesh).unwrap();
        prop_assert!(twice.was_noop);
        prop_assert_eq!(twice.mesh, once.mesh);
    }

    #[test]
    fn proptest_triangulate_keeps_vertices(mesh in arb_polygon_mesh()) {
        let result = triangulate(&mesh).unwrap();
        prop_assert_eq!(&result.mesh.vertices, &mesh.vertices);
        let max_triangles: usize = mesh.faces.iter().map(|f| f.len() - 2).sum();
        prop_assert!(result.mesh.faces.len() <= max_triangles);
    }

    #[test]
    fn proptest_grid_quadrangulates_to_half(w in 1u32..6, h in 1u32..6) {
        let grid = triangulated_grid(w, h);
        let result = quadrangulate(&grid).unwrap();
        prop_assert_eq!(result.quads, grid.faces.len() / 2);
        prop_assert!(result.mesh.faces.iter().all(|f| f.len() == 4));
    }

    #[test]
    fn proptest_odd_triangle_count_never_quadrangulates(w in 1u32..5, h in 1u32..5) {
        let mut grid = triangulated_grid(w, h);
        grid.faces.pop();
        let result = quadrangulate(&grid);
        let is_incomplete = matches!(result, Err(TopologyError::IncompletePairing { .. }));
        prop_assert!(is_incomplete);
    }

    #[test]
    fn proptest_edge_split_only_adds_vertices(
        mesh in arb_polygon_mesh(),
        angle in 0.0..180.0f64,
    ) {
        let result = edge_split(&mesh, angle).unwrap();
        prop_assert_eq!(result.mesh.faces.len(), mesh.faces.len());
        prop_assert_eq!(result.mesh.vertices.len(), mesh.vertices.len() + result.vertices_added);
        prop_assert!(result.mesh.validate().is_ok());
    }

    #[test]
    fn proptest_cube_split_depends_on_threshold(angle in 0.1..180.0f64) {
        let result = edge_split(&unit_cube(), angle).unwrap();
        let expected = if angle <= 90.0 { 16 } else { 0 };
        prop_assert_eq!(result.vertices_added, expected);
    }
}
