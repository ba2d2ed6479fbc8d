//! Property-based tests for simplify and the built-in decimator.
//!
//! Run with: cargo test -p mesh-retopo -- proptest

use mesh_retopo::{ClusterDecimator, MIN_TARGET_FACES, simplify, target_face_count};
use mesh_types::IndexedMesh;
use proptest::prelude::*;

/// Triangulated height field over a `n` by `n` grid.
fn terrain(n: u32, amplitude: f64) -> IndexedMesh {
    let mut positions = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            let (fx, fy) = (f64::from(x), f64::from(y));
            positions.push([fx, fy, amplitude * (fx * 0.7).sin() * (fy * 0.5).cos()]);
        }
    }
    let mut faces = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let a = y * (n + 1) + x;
            let (b, c, d) = (a + 1, a + n + 2, a + n + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    IndexedMesh::from_arrays(&positions, &faces)
}

proptest! {
    #[test]
    fn proptest_target_never_below_minimum(faces in 0usize..100_000, factor in 0.0001f64..=1.0) {
        let target = target_face_count(faces, factor);
        prop_assert!(target >= MIN_TARGET_FACES);
        prop_assert!(target <= faces.max(MIN_TARGET_FACES));
    }

    #[test]
    fn proptest_cluster_output_is_valid(n in 4u32..16, amplitude in 0.0f64..3.0, factor in 0.05f64..=1.0) {
        let mesh = terrain(n, amplitude);
        let result = simplify(&mesh, &ClusterDecimator::default(), factor).unwrap();

        prop_assert!(result.mesh.validate().is_ok());
        prop_assert!(result.final_faces > 0);
        prop_assert!(result.final_faces <= result.original_faces);
        prop_assert_eq!(result.final_faces, result.mesh.faces.len());
    }

    #[test]
    fn proptest_cluster_stays_inside_bounds(n in 4u32..12, factor in 0.05f64..0.9) {
        let mesh = terrain(n, 1.0);
        let result = simplify(&mesh, &ClusterDecimator::default(), factor).unwrap();
        let tol = 1e-9;
        for v in &result.mesh.vertices {
            prop_assert!(v.position.x >= -tol && v.position.x <= f64::from(n) + tol);
            prop_assert!(v.position.y >= -tol && v.position.y <= f64::from(n) + tol);
            prop_assert!(v.position.z.abs() <= 1.0 + tol);
        }
    }
}
