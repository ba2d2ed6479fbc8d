//! Core mesh types for the mesh repair toolkit.
//!
//! This crate provides the foundational types every operator crate shares:
//!
//! - [`Vertex`] - A point in 3D space with an optional normal
//! - [`Face`] - An ordered polygon of vertex indices (triangles, quads, N-gons)
//! - [`Edge`] - A canonical, unordered vertex pair used as a lookup key
//! - [`IndexedMesh`] - Indexed vertex and face buffers
//! - [`MeshAdjacency`] - Edge→faces, vertex→faces and face-neighbour maps
//! - [`MeshIndex`] - Lazily derived adjacency and face normals for one mesh
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Headless
//!
//! No rendering or GUI dependencies. The crate can be used from CLI tools, servers and any orchestrating layer that owns a
//! working mesh.
//!
//! # Immutable Transforms
//!
//! Operators in the sibling crates borrow an [`IndexedMesh`] immutably and
//! return a new one. Derived data ([`MeshAdjacency`], face normals) is a pure
//! function of the buffers and is never cached across mesh versions.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**. Face winding is
//! **counter-clockwise (CCW) when viewed from outside**, so normals point
//! outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Face, IndexedMesh, MeshAdjacency, MeshTopology, Vertex};
//!
//! let mesh = IndexedMesh::from_parts(
//!     vec![
//!         Vertex::from_coords(0.0, 0.0, 0.0),
//!         Vertex::from_coords(1.0, 0.0, 0.0),
//!         Vertex::from_coords(0.5, 1.0, 0.0),
//!     ],
//!     vec![Face::from_slice(&[0, 1, 2])],
//! );
//!
//! assert_eq!(mesh.face_count(), 1);
//! let adjacency = MeshAdjacency::build(&mesh.faces);
//! assert_eq!(adjacency.boundary_edge_count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod bounds;
mod edge;
mod error;
mod face;
mod index;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use adjacency::MeshAdjacency;
pub use bounds::Aabb;
pub use edge::Edge;
pub use error::{MeshError, MeshResult};
pub use face::{
    DEGENERATE_NORMAL_EPSILON, Face, directed_edges, face_area, face_normal, newell_normal,
    unique_vertex_count,
};
pub use index::MeshIndex;
pub use mesh::{IndexedMesh, unit_cube, unit_cube_quads};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
