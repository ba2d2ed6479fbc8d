//! Indexed polygon mesh.

use crate::face::{face_area, face_normal};
use crate::{Aabb, Face, MeshBounds, MeshError, MeshResult, MeshTopology, Vertex};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed polygon mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices
/// by index. Triangles are the common case, but quads and N-gons appear
/// between operators (quadrangulate, subdivide, solidify rims).
///
/// # Invariant
///
/// Operators expect every face index to be in `[0, vertices.len())` and
/// every face to have at least three slots. [`IndexedMesh::validate`]
/// checks this for buffers that come from outside (files, callers).
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology};
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
///     &[[0, 1, 2]],
/// );
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Polygon faces as indices into the vertex array.
    pub faces: Vec<Face>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from coordinate arrays and face index lists.
    ///
    /// Faces may be fixed arrays (`[u32; 3]`, `[u32; 4]`) or `Vec<u32>`
    /// for mixed polygon sizes.
    #[must_use]
    pub fn from_arrays<F: AsRef<[u32]>>(positions: &[[f64; 3]], faces: &[F]) -> Self {
        Self {
            vertices: positions
                .iter()
                .map(|&[x, y, z]| Vertex::from_coords(x, y, z))
                .collect(),
            faces: faces.iter().map(|f| Face::from_slice(f.as_ref())).collect(),
        }
    }

    /// Create a triangle mesh from flat coordinate and index arrays.
    ///
    /// Returns an empty mesh if either array length is not a multiple of 3.
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        Self {
            vertices: positions
                .chunks_exact(3)
                .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
                .collect(),
            faces: indices.chunks_exact(3).map(Face::from_slice).collect(),
        }
    }

    /// Check that the buffers form a structurally valid mesh.
    ///
    /// An empty mesh is valid. Use [`IndexedMesh::require_faces`] for
    /// operators that need geometry to work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`MeshError`] found: a face with fewer than three
    /// slots, an out-of-range index, or a non-finite vertex position.
    pub fn validate(&self) -> MeshResult<()> {
        let vertex_count = self.vertices.len();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::FaceTooSmall {
                    face: face_idx,
                    len: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
        if let Some(vertex) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::NonFinitePosition { vertex });
        }
        Ok(())
    }

    /// Validate and require at least one face.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyMesh`] if there are no faces or no
    /// vertices, otherwise whatever [`IndexedMesh::validate`] reports.
    pub fn require_faces(&self) -> MeshResult<()> {
        if self.faces.is_empty() || self.vertices.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        self.validate()
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Copy of the mesh moved so its bounding-box center is at the origin.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_cube, MeshBounds, Point3};
    ///
    /// let centered = unit_cube().centered();
    /// assert_eq!(centered.center(), Point3::origin());
    /// ```
    #[must_use]
    pub fn centered(&self) -> Self {
        let mut mesh = self.clone();
        if let Some(bounds) = self.bounds_opt() {
            mesh.translate(-bounds.center().coords);
        }
        mesh
    }

    /// Signed volume by the divergence theorem.
    ///
    /// Positive for a closed mesh with outward-facing winding, negative when
    /// inside-out. Polygons are fanned from their first vertex. The value is
    /// only meaningful for closed meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for face in &self.faces {
            let p0 = self.vertices[face[0] as usize].position.coords;
            for w in face[1..].windows(2) {
                let p1 = self.vertices[w[0] as usize].position.coords;
                let p2 = self.vertices[w[1] as usize].position.coords;
                volume += p0.dot(&p1.cross(&p2));
            }
        }
        volume / 6.0
    }

    /// Absolute volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Check if the signed volume is negative.
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(|f| face_area(&self.vertices, f)).sum()
    }

    /// Unit normal of every face; `None` marks a degenerate face.
    #[must_use]
    pub fn face_normals(&self) -> Vec<Option<Vector3<f64>>> {
        self.faces
            .iter()
            .map(|f| face_normal(&self.vertices, f))
            .collect()
    }

    /// Area of every face.
    #[must_use]
    pub fn face_areas(&self) -> Vec<f64> {
        self.faces.iter().map(|f| face_area(&self.vertices, f)).collect()
    }

    /// Reverse the winding of every face and negate vertex normals.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.reverse();
        }
        for vertex in &mut self.vertices {
            if let Some(normal) = vertex.normal.as_mut() {
                *normal = -*normal;
            }
        }
    }

    /// Drop every vertex normal.
    pub fn clear_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = None;
        }
    }

    /// Flags marking which vertices are referenced by at least one face.
    #[must_use]
    pub fn referenced_vertices(&self) -> Vec<bool> {
        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for &v in face {
                if let Some(slot) = used.get_mut(v as usize) {
                    *slot = true;
                }
            }
        }
        used
    }

    /// Keep only the flagged vertices, remapping faces contiguously.
    ///
    /// Returns the new mesh and the old→new index map. Faces that reference
    /// a dropped vertex are dropped as well.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    pub fn retain_vertices(&self, keep: &[bool]) -> (Self, Vec<Option<u32>>) {
        let mut remap = vec![None; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (old, vertex) in self.vertices.iter().enumerate() {
            if keep.get(old).copied().unwrap_or(false) {
                remap[old] = Some(vertices.len() as u32);
                vertices.push(vertex.clone());
            }
        }

        let faces = self
            .faces
            .iter()
            .filter_map(|face| {
                face.iter()
                    .map(|&v| remap.get(v as usize).copied().flatten())
                    .collect::<Option<Face>>()
            })
            .collect();

        (Self { vertices, faces }, remap)
    }

    /// Copy of the mesh without vertices that no face references.
    ///
    /// Returns the new mesh and the number of vertices removed.
    #[must_use]
    pub fn without_unreferenced_vertices(&self) -> (Self, usize) {
        let keep = self.referenced_vertices();
        let (mesh, _) = self.retain_vertices(&keep);
        let removed = self.vertices.len() - mesh.vertices.len();
        (mesh, removed)
    }

    /// Append another mesh, offsetting its face indices.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, so vertex counts > 4B are unsupported
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().cloned());
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| f.iter().map(|&v| v + offset).collect::<Face>()),
        );
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<&[u32]> {
        self.faces.get(index).map(Face::as_slice)
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Unit cube from (0,0,0) to (1,1,1) as 12 outward-facing triangles.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    IndexedMesh::from_arrays(
        &CUBE_CORNERS,
        &[
            // Bottom (-Z)
            [0, 2, 1],
            [0, 3, 2],
            // Top (+Z)
            [4, 5, 6],
            [4, 6, 7],
            // Front (-Y)
            [0, 1, 5],
            [0, 5, 4],
            // Back (+Y)
            [3, 7, 6],
            [3, 6, 2],
            // Left (-X)
            [0, 4, 7],
            [0, 7, 3],
            // Right (+X)
            [1, 2, 6],
            [1, 6, 5],
        ],
    )
}

/// Unit cube as 6 outward-facing quads.
#[must_use]
pub fn unit_cube_quads() -> IndexedMesh {
    IndexedMesh::from_arrays(
        &CUBE_CORNERS,
        &[
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 7, 6, 2],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ],
    )
}
