//! Polygon faces and per-face geometry.

use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::Vertex;

/// An ordered polygon of vertex indices.
///
/// Triangles and quads are stored inline; larger N-gons spill to the heap.
/// Winding is counter-clockwise when viewed from outside.
pub type Face = SmallVec<[u32; 4]>;

/// Relative tolerance for calling a face normal degenerate.
///
/// A face is degenerate when its Newell vector is no longer than this
/// factor times the squared length of its longest edge.
pub const DEGENERATE_NORMAL_EPSILON: f64 = 1e-12;

/// Number of distinct vertex indices in a face.
///
/// # Example
///
/// ```
/// use mesh_types::unique_vertex_count;
///
/// assert_eq!(unique_vertex_count(&[0, 1, 2]), 3);
/// assert_eq!(unique_vertex_count(&[0, 1, 1, 0]), 2);
/// ```
#[must_use]
pub fn unique_vertex_count(face: &[u32]) -> usize {
    let mut seen: SmallVec<[u32; 8]> = SmallVec::new();
    for &v in face {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen.len()
}

/// Directed edges of a face in winding order, including the closing edge.
pub fn directed_edges(face: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    let n = face.len();
    (0..n).map(move |i| (face[i], face[(i + 1) % n]))
}

/// Unnormalized polygon normal by Newell's method.
///
/// For a planar polygon the magnitude equals twice its area; for triangles
/// this is the usual edge cross product.
#[must_use]
pub fn newell_normal(vertices: &[Vertex], face: &[u32]) -> Vector3<f64> {
    let mut n = Vector3::zeros();
    for (a, b) in directed_edges(face) {
        let p = vertices[a as usize].position;
        let q = vertices[b as usize].position;
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n
}

/// Area of a polygon face.
///
/// Faces with fewer than three distinct vertices have zero area.
#[must_use]
pub fn face_area(vertices: &[Vertex], face: &[u32]) -> f64 {
    if unique_vertex_count(face) < 3 {
        return 0.0;
    }
    newell_normal(vertices, face).norm() * 0.5
}

/// Unit normal of a face, or `None` when the face is degenerate.
///
/// # Example
///
/// ```
/// use mesh_types::{face_normal, Vertex};
///
/// let vertices = vec![
///     Vertex::from_coords(0.0, 0.0, 0.0),
///     Vertex::from_coords(1.0, 0.0, 0.0),
///     Vertex::from_coords(0.0, 1.0, 0.0),
///     Vertex::from_coords(2.0, 0.0, 0.0),
/// ];
///
/// let n = face_normal(&vertices, &[0, 1, 2]).unwrap();
/// assert!((n.z - 1.0).abs() < 1e-12);
///
/// // Collinear
/// assert!(face_normal(&vertices, &[0, 1, 3]).is_none());
/// ```
#[must_use]
pub fn face_normal(vertices: &[Vertex], face: &[u32]) -> Option<Vector3<f64>> {
    if unique_vertex_count(face) < 3 {
        return None;
    }
    let n = newell_normal(vertices, face);
    let longest_sq = directed_edges(face)
        .map(|(a, b)| (vertices[b as usize].position - vertices[a as usize].position).norm_squared())
        .fold(0.0, f64::max);
    let len = n.norm();
    if len <= DEGENERATE_NORMAL_EPSILON * longest_sq || len == 0.0 {
        None
    } else {
        Some(n / len)
    }
}
