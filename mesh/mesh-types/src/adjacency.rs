//! Mesh adjacency data structures.
//!
//! Every map here is built in a single pass over the faces with a hashed
//! canonical-edge key, so building is O(F) regardless of mesh size.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::Edge;
use crate::face::directed_edges;

/// Face list for one edge. Manifold meshes never exceed two entries.
type EdgeFaces = SmallVec<[usize; 2]>;

/// Adjacency information derived from a face buffer.
///
/// Provides lookups for:
/// - Faces containing an edge (the edge occurrence count)
/// - Faces incident to a vertex
/// - Boundary edges (occurrence 1) and non-manifold edges (occurrence ≥ 3)
/// - Face neighbours across shared edges
/// - Vertex valence
///
/// The structure is a pure function of the faces and must be rebuilt for
/// every new mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    edge_to_faces: HashMap<Edge, EdgeFaces>,
    vertex_to_faces: HashMap<u32, Vec<usize>>,
    face_count: usize,
}

impl MeshAdjacency {
    /// Build adjacency information from a list of polygon faces.
    ///
    /// Self-edges (a face repeating a vertex consecutively) are skipped, and
    /// a face is listed at most once per edge.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::MeshAdjacency;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let adj = MeshAdjacency::build(&faces);
    ///
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert_eq!(adj.faces_for_edge(1, 2), &[0, 1]);
    /// ```
    #[must_use]
    pub fn build<F: AsRef<[u32]>>(faces: &[F]) -> Self {
        let mut edge_to_faces: HashMap<Edge, EdgeFaces> = HashMap::with_capacity(faces.len() * 2);
        let mut vertex_to_faces: HashMap<u32, Vec<usize>> = HashMap::with_capacity(faces.len());

        for (face_idx, face) in faces.iter().enumerate() {
            let face = face.as_ref();

            for &v in face {
                let list = vertex_to_faces.entry(v).or_default();
                if list.last() != Some(&face_idx) {
                    list.push(face_idx);
                }
            }

            for (a, b) in directed_edges(face) {
                if a == b {
                    continue;
                }
                let list = edge_to_faces.entry(Edge::new(a, b)).or_default();
                if !list.contains(&face_idx) {
                    list.push(face_idx);
                }
            }
        }

        Self {
            edge_to_faces,
            vertex_to_faces,
            face_count: faces.len(),
        }
    }

    /// Faces containing an edge, in ascending face order.
    ///
    /// Returns an empty slice if no face contains the edge.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> &[usize] {
        self.edge_to_faces
            .get(&Edge::new(v0, v1))
            .map_or(&[], SmallVec::as_slice)
    }

    /// Number of faces containing an edge.
    #[inline]
    #[must_use]
    pub fn edge_occurrence(&self, edge: Edge) -> usize {
        self.edge_to_faces.get(&edge).map_or(0, SmallVec::len)
    }

    /// Faces incident to a vertex, in ascending face order.
    ///
    /// Returns an empty slice if the vertex has no incident faces.
    #[must_use]
    pub fn faces_for_vertex(&self, v: u32) -> &[usize] {
        self.vertex_to_faces.get(&v).map_or(&[], Vec::as_slice)
    }

    /// Iterate over every edge with its face list.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, &[usize])> + '_ {
        self.edge_to_faces
            .iter()
            .map(|(&edge, faces)| (edge, faces.as_slice()))
    }

    /// Iterate over all boundary edges (exactly one face).
    ///
    /// Iteration order is unspecified; sort the result when determinism
    /// matters.
    pub fn boundary_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Count the number of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|f| f.len() == 1).count()
    }

    /// Iterate over all non-manifold edges (three or more faces).
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .map(|(&edge, _)| edge)
    }

    /// Count the number of non-manifold edges.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|f| f.len() > 2).count()
    }

    /// Check that no edge has more than two faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|f| f.len() <= 2)
    }

    /// Check that every edge has exactly two faces.
    ///
    /// A mesh without edges is vacuously watertight.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|f| f.len() == 2)
    }

    /// Total number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Number of vertices referenced by at least one face.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_to_faces.len()
    }

    /// Number of faces the adjacency was built from.
    #[must_use]
    pub const fn face_count(&self) -> usize {
        self.face_count
    }

    /// Valence (number of distinct incident edges) of every vertex.
    ///
    /// Vertices `>= vertex_count` are ignored; unreferenced vertices have
    /// valence 0.
    #[must_use]
    pub fn valences(&self, vertex_count: usize) -> Vec<usize> {
        let mut valence = vec![0usize; vertex_count];
        for edge in self.edge_to_faces.keys() {
            for v in [edge.min(), edge.max()] {
                if let Some(slot) = valence.get_mut(v as usize) {
                    *slot += 1;
                }
            }
        }
        valence
    }

    /// Edge-sharing neighbours of every face, sorted and deduplicated.
    ///
    /// Faces across a non-manifold edge are all neighbours of each other.
    #[must_use]
    pub fn face_neighbors(&self) -> Vec<SmallVec<[usize; 4]>> {
        let mut neighbors: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); self.face_count];
        for faces in self.edge_to_faces.values() {
            for &f in faces {
                for &g in faces {
                    if f != g && f < self.face_count {
                        neighbors[f].push(g);
                    }
                }
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        neighbors
    }
}
