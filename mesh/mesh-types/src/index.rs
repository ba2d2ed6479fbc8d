//! Lazily derived data for a single mesh version.

use std::cell::OnceCell;

use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::{IndexedMesh, MeshAdjacency};

/// Borrowed view of one mesh that derives adjacency and face normals on
/// first use.
///
/// The view borrows the mesh immutably, so derived data can never outlive
/// or disagree with the buffers it came from. Operators create one per
/// invocation and drop it with the scratch state.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshIndex};
///
/// let cube = unit_cube();
/// let index = MeshIndex::new(&cube);
///
/// assert!(index.adjacency().is_watertight());
/// assert!(index.face_normals().iter().all(Option::is_some));
/// ```
#[derive(Debug)]
pub struct MeshIndex<'a> {
    mesh: &'a IndexedMesh,
    adjacency: OnceCell<MeshAdjacency>,
    face_normals: OnceCell<Vec<Option<Vector3<f64>>>>,
    face_neighbors: OnceCell<Vec<SmallVec<[usize; 4]>>>,
}

impl<'a> MeshIndex<'a> {
    /// Wrap a mesh. Nothing is computed until requested.
    #[must_use]
    pub const fn new(mesh: &'a IndexedMesh) -> Self {
        Self {
            mesh,
            adjacency: OnceCell::new(),
            face_normals: OnceCell::new(),
            face_neighbors: OnceCell::new(),
        }
    }

    /// The wrapped mesh.
    #[inline]
    #[must_use]
    pub const fn mesh(&self) -> &'a IndexedMesh {
        self.mesh
    }

    /// Edge→faces and vertex→faces maps.
    pub fn adjacency(&self) -> &MeshAdjacency {
        self.adjacency
            .get_or_init(|| MeshAdjacency::build(&self.mesh.faces))
    }

    /// Per-face unit normals; `None` marks a degenerate face.
    pub fn face_normals(&self) -> &[Option<Vector3<f64>>] {
        self.face_normals.get_or_init(|| self.mesh.face_normals())
    }

    /// Edge-sharing neighbours of every face.
    pub fn face_neighbors(&self) -> &[SmallVec<[usize; 4]>] {
        self.face_neighbors
            .get_or_init(|| self.adjacency().face_neighbors())
    }
}
