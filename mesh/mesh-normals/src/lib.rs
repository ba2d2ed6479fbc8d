//! Vertex normals, hard-edge classification and auto-smooth shading.
//!
//! - [`vertex_normals`] averages face normals, uniformly or by area
//! - [`classify_edges`] labels each edge by its dihedral angle
//! - [`corner_fans`] groups face corners around a vertex between hard edges
//! - [`auto_smooth`] splits vertices along hard edges and shades each fan
//! - [`smooth_shade`] assigns smooth normals without touching topology
//! - [`transfer_normals`] copies normals onto a mesh with different topology
//!
//! A vertex whose incident normals cancel gets a zero normal and is listed
//! in the result's `zero_length` instead of failing the operation.
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_normals::{classify_edges, EdgeKind};
//!
//! let edges = classify_edges(&unit_cube(), 30.0).unwrap();
//! assert_eq!(edges.count(EdgeKind::Hard), 12);
//! assert_eq!(edges.count(EdgeKind::Smooth), 6);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod dihedral;
mod error;
mod fans;
mod smooth;
mod transfer;
mod vertex;

pub use dihedral::{EdgeClassification, EdgeKind, classify_edges, dihedral_angle_degrees};
pub use error::{NormalsError, NormalsResult};
pub use fans::{CornerFans, corner_fans};
pub use smooth::{AutoSmoothParams, AutoSmoothResult, ShadeResult, auto_smooth, smooth_shade, split_by_fans};
pub use transfer::{TransferMethod, TransferResult, transfer_normals};
pub use vertex::{
    NormalWeighting, VertexNormals, vertex_normals, vertex_normals_area_weighted,
    vertex_normals_unweighted,
};
