//! Core subdivision algorithms.

// Vertex and face counts stay within u32 for u32-indexed meshes
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use hashbrown::HashMap;
use mesh_normals::{NormalWeighting, vertex_normals};
use mesh_types::{Edge, Face, IndexedMesh, Point3, Vector3, Vertex};
use smallvec::smallvec;
use tracing::{debug, info};

use crate::error::{SubdivideError, SubdivideResult};
use crate::params::{SubdivideParams, SubdivisionMethod};
use crate::result::SubdivisionResult;

/// Subdivide a mesh using the specified parameters.
///
/// Each iteration runs on the previous iteration's output. New vertices
/// sit at edge midpoints (and face centroids for
/// [`SubdivisionMethod::Centroid`]); existing vertices do not move.
///
/// # Errors
///
/// Returns an error if:
/// - The mesh is invalid or has no faces
/// - The iteration count is 0
/// - Midpoint subdivision gets a non-triangle face
/// - Any iteration would exceed `max_faces`
///
/// # Examples
///
/// ```
/// use mesh_types::unit_cube_quads;
/// use mesh_subdivide::{subdivide_mesh, SubdivideParams};
///
/// // Each quad becomes four quads around its centroid
/// let result = subdivide_mesh(&unit_cube_quads(), &SubdivideParams::centroid())?;
///
/// assert_eq!(result.final_faces, 24);
/// // 8 corners + 12 edge midpoints + 6 face centroids
/// assert_eq!(result.final_vertices, 26);
/// # Ok::<(), mesh_subdivide::SubdivideError>(())
/// ```
pub fn subdivide_mesh(
    mesh: &IndexedMesh,
    params: &SubdivideParams,
) -> SubdivideResult<SubdivisionResult> {
    mesh.require_faces()?;
    if params.iterations == 0 {
        return Err(SubdivideError::InvalidIterations(0));
    }
    if params.method == SubdivisionMethod::Midpoint {
        if let Some((face, f)) = mesh.faces.iter().enumerate().find(|(_, f)| f.len() != 3) {
            return Err(SubdivideError::NotTriangulated { face, len: f.len() });
        }
    }
    check_budget(mesh, params)?;

    let original_faces = mesh.faces.len();
    let original_vertices = mesh.vertices.len();

    debug!(
        "Subdividing mesh: {} faces, {} vertices, {} iterations using {:?}",
        original_faces, original_vertices, params.iterations, params.method
    );

    let mut current = strip_normals(mesh);
    for i in 0..params.iterations {
        current = match params.method {
            SubdivisionMethod::Centroid => subdivide_centroid(&current),
            SubdivisionMethod::Midpoint => subdivide_midpoint(&current),
        };
        debug!(
            "Iteration {}: {} faces, {} vertices",
            i + 1,
            current.faces.len(),
            current.vertices.len()
        );
    }

    let mut zero_length_normals = Vec::new();
    if params.recompute_normals {
        let normals = vertex_normals(&current, NormalWeighting::Area);
        for (vertex, normal) in current.vertices.iter_mut().zip(&normals.normals) {
            vertex.normal = Some(*normal);
        }
        zero_length_normals = normals.zero_length;
    }

    let result = SubdivisionResult {
        original_faces,
        final_faces: current.faces.len(),
        original_vertices,
        final_vertices: current.vertices.len(),
        iterations: params.iterations,
        method: params.method,
        zero_length_normals,
        mesh: current,
    };
    info!("{result}");
    Ok(result)
}

/// Reject the run before any work if some iteration would pass the budget.
fn check_budget(mesh: &IndexedMesh, params: &SubdivideParams) -> SubdivideResult<()> {
    let mut faces = mesh.faces.len();
    let mut corners: usize = mesh.faces.iter().map(|f| f.len()).sum();
    for _ in 0..params.iterations {
        let next = params.faces_after_step(faces, corners);
        if next > params.max_faces {
            return Err(SubdivideError::MeshTooLarge {
                current: mesh.faces.len(),
                projected: next,
                max: params.max_faces,
            });
        }
        corners = match params.method {
            SubdivisionMethod::Centroid => next.saturating_mul(4),
            SubdivisionMethod::Midpoint => next.saturating_mul(3),
        };
        faces = next;
    }
    Ok(())
}

fn strip_normals(mesh: &IndexedMesh) -> IndexedMesh {
    let vertices = mesh.vertices.iter().map(|v| Vertex::new(v.position)).collect();
    IndexedMesh::from_parts(vertices, mesh.faces.clone())
}

/// Split every n-gon into n quads around its centroid.
///
/// Quad `i` of a face runs corner `i`, the midpoint of the edge leaving it,
/// the centroid, and the midpoint of the edge entering it, which keeps the
/// face's winding.
fn subdivide_centroid(mesh: &IndexedMesh) -> IndexedMesh {
    let corners: usize = mesh.faces.iter().map(|f| f.len()).sum();
    let mut midpoints = MidpointCache::new(mesh, corners / 2 + mesh.faces.len());
    let mut faces: Vec<Face> = Vec::with_capacity(corners);

    for face in &mesh.faces {
        let n = face.len();
        let sum = face
            .iter()
            .fold(Vector3::zeros(), |acc, &v| acc + mesh.vertices[v as usize].position.coords);
        let centroid = midpoints.push(Point3::from(sum / n as f64));

        let mids: Vec<u32> = (0..n)
            .map(|i| midpoints.get(face[i], face[(i + 1) % n]))
            .collect();
        for i in 0..n {
            faces.push(smallvec![face[i], mids[i], centroid, mids[(i + n - 1) % n]]);
        }
    }

    IndexedMesh::from_parts(midpoints.vertices, faces)
}

/// Split every triangle into four through its edge midpoints.
fn subdivide_midpoint(mesh: &IndexedMesh) -> IndexedMesh {
    let mut midpoints = MidpointCache::new(mesh, mesh.faces.len() * 3 / 2);
    let mut faces: Vec<Face> = Vec::with_capacity(mesh.faces.len() * 4);

    for face in &mesh.faces {
        let (v0, v1, v2) = (face[0], face[1], face[2]);
        let m01 = midpoints.get(v0, v1);
        let m12 = midpoints.get(v1, v2);
        let m20 = midpoints.get(v2, v0);

        // Corner triangles
        faces.push(smallvec![v0, m01, m20]);
        faces.push(smallvec![v1, m12, m01]);
        faces.push(smallvec![v2, m20, m12]);
        // Center triangle
        faces.push(smallvec![m01, m12, m20]);
    }

    IndexedMesh::from_parts(midpoints.vertices, faces)
}

/// Output vertex buffer with one shared midpoint per edge.
struct MidpointCache {
    vertices: Vec<Vertex>,
    by_edge: HashMap<Edge, u32>,
}

impl MidpointCache {
    fn new(mesh: &IndexedMesh, extra: usize) -> Self {
        let mut vertices = Vec::with_capacity(mesh.vertices.len() + extra);
        vertices.extend(mesh.vertices.iter().cloned());
        Self {
            vertices,
            by_edge: HashMap::with_capacity(extra),
        }
    }

    fn push(&mut self, position: Point3<f64>) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(position));
        idx
    }

    fn get(&mut self, v0: u32, v1: u32) -> u32 {
        let edge = Edge::new(v0, v1);
        if let Some(&idx) = self.by_edge.get(&edge) {
            return idx;
        }
        let p0 = self.vertices[v0 as usize].position.coords;
        let p1 = self.vertices[v1 as usize].position.coords;
        let idx = self.push(Point3::from((p0 + p1) * 0.5));
        self.by_edge.insert(edge, idx);
        idx
    }
}
