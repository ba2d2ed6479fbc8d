//! Regression tests on triangle soup, the way STL files arrive.
//!
//! Each test starts from a deterministic soup (every triangle owns its three
//! vertices) and checks geometric properties of the repaired output: counts,
//! bounds, enclosed volume and watertightness.
//!
//! Run with: cargo test -p mesh-repair --test soup_regression

use approx::assert_relative_eq;
use mesh_repair::{
    HoleFillRepairer, RepairParams, analyze, cleanup_components, is_watertight, repair_mesh,
    repair_to_manifold, weld_vertices,
};
use mesh_types::{Face, IndexedMesh, MeshBounds, MeshTopology, Vertex, unit_cube};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Unit cube centered on the origin with no shared vertices (36 vertices).
fn cube_soup() -> IndexedMesh {
    let cube = unit_cube().centered();
    let mut soup = IndexedMesh::new();
    for face in &cube.faces {
        let base = soup.vertices.len() as u32;
        soup.vertices
            .extend(face.iter().map(|&v| cube.vertices[v as usize].clone()));
        soup.faces.push(Face::from_slice(&[base, base + 1, base + 2]));
    }
    soup
}

// =============================================================================
// Regression Tests
// =============================================================================

#[test]
fn soup_has_expected_properties() {
    let soup = cube_soup();
    assert_eq!(soup.vertex_count(), 36);
    assert_eq!(soup.face_count(), 12);

    let report = analyze(&soup);
    assert_eq!(report.duplicate_vertex_count, 28);
    assert_eq!(report.open_edge_count, 36);
    assert_eq!(report.component_count, 12);
    assert!(!report.is_watertight);
}

#[test]
fn weld_soup_produces_cube() {
    let soup = cube_soup();
    let result = weld_vertices(&soup, 1e-6);

    assert_eq!(result.vertices_merged, 28);
    assert_eq!(result.mesh.vertex_count(), 8);
    assert_eq!(result.mesh.face_count(), 12);
    assert!(is_watertight(&result.mesh));
    assert_relative_eq!(result.mesh.volume(), 1.0, epsilon = 1e-10);

    let bounds = result.mesh.bounds();
    assert_relative_eq!(bounds.min.coords, soup.bounds().min.coords, epsilon = 1e-12);
    assert_relative_eq!(bounds.max.coords, soup.bounds().max.coords, epsilon = 1e-12);
}

#[test]
fn repair_pipeline_closes_soup() {
    let (repaired, summary) = repair_mesh(&cube_soup(), &RepairParams::default());
    assert_eq!(summary.vertices_welded, 28);
    assert_eq!(summary.final_vertices, 8);
    assert!(is_watertight(&repaired));
    assert_eq!(analyze(&repaired).component_count, 1);
}

#[test]
fn manifold_repair_of_punctured_soup() {
    let mut soup = cube_soup();
    soup.faces.truncate(10);
    assert!(!is_watertight(&soup));

    let result = repair_to_manifold(&soup, &HoleFillRepairer::default()).unwrap();
    assert!(result.is_clean());
    assert_eq!(result.mesh.vertex_count(), 8);
    assert_eq!(result.mesh.face_count(), 12);
    assert_relative_eq!(result.mesh.signed_volume(), 1.0, epsilon = 1e-10);

    let center = result.mesh.center();
    assert_relative_eq!(center.coords.norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn stray_triangle_is_cleaned_up() {
    let (mut mesh, _) = repair_mesh(&cube_soup(), &RepairParams::default());
    mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
    mesh.vertices.push(Vertex::from_coords(6.0, 5.0, 5.0));
    mesh.vertices.push(Vertex::from_coords(5.0, 6.0, 5.0));
    mesh.faces.push(Face::from_slice(&[8, 9, 10]));

    let result = cleanup_components(&mesh, 2).unwrap();
    assert_eq!(result.components_removed, 1);
    assert_eq!(result.mesh.vertex_count(), 8);
    assert!(is_watertight(&result.mesh));
}
