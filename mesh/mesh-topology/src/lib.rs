//! Face-structure operators for indexed meshes.
//!
//! - [`triangulate`]: fan-split polygons, dropping degenerate faces
//! - [`quadrangulate`]: merge triangle pairs into quads, all or nothing
//! - [`edge_split`]: duplicate vertices along hard edges
//!
//! Each operator borrows its input and returns a new mesh; a failed
//! operation returns an error and produces nothing.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube_quads;
//! use mesh_topology::{quadrangulate, triangulate};
//!
//! let tris = triangulate(&unit_cube_quads()).unwrap().mesh;
//! let quads = quadrangulate(&tris).unwrap().mesh;
//! assert_eq!(quads.faces.len(), 6);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod edge_split;
mod error;
mod quadrangulate;
mod triangulate;

pub use edge_split::{EdgeSplitResult, edge_split};
pub use error::{TopologyError, TopologyResult};
pub use quadrangulate::{QuadrangulateResult, quadrangulate};
pub use triangulate::{TriangulateResult, is_triangulated, triangulate};
