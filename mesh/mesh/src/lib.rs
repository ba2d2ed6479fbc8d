//! Mesh defect analysis and topology repair.
//!
//! This umbrella crate re-exports the mesh-* crates and adds the piece that
//! ties them together: a [`MeshSession`] owning the loaded mesh and the
//! working mesh, running [`Operation`]s on them so that a failed operation
//! never leaves a half-modified mesh behind.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh::prelude::*;
//!
//! let mut session = MeshSession::new();
//! let report = session.load_file("model.stl").unwrap();
//! println!("{report}");
//!
//! session.apply(&Operation::Repair).unwrap();
//! session.apply(&Operation::Simplify { factor: 0.5 }).unwrap();
//! session.apply(&Operation::SmoothShade).unwrap();
//! session.save_working("model_repaired.stl").unwrap();
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - `IndexedMesh`, `Vertex`, `Face`, adjacency and validation
//! - [`spatial`] - k-d tree proximity queries
//! - [`io`] - STL and OBJ loading and saving
//!
//! ## Analysis & Repair
//! - [`repair`] - Defect analysis, welding, cleanup, hole filling, winding
//!
//! ## Shading & Topology
//! - [`normals`] - Vertex normals, hard edges, auto-smooth, normal transfer
//! - [`topology`] - Triangulate, quadrangulate, edge split
//! - [`subdivide`] - Centroid and midpoint subdivision
//! - [`shell`] - Solidify
//! - [`retopo`] - Decimation and remeshing backends, auto-retopology
//!
//! ## Orchestration
//! - [`MeshSession`] - Loaded/working mesh slots and the operator boundary
//! - [`PipelineConfig`] - TOML list of operations

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod error;
mod operation;
mod session;

pub use config::{ConfigError, PipelineConfig};
pub use error::{SessionError, SessionResult};
pub use operation::Operation;
pub use session::{MeshSession, OperationReport, SessionSettings, SessionState};

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `IndexedMesh`, `Vertex`, `Face`, `MeshAdjacency`.
pub use mesh_types as types;

/// k-d tree proximity index.
pub use mesh_spatial as spatial;

/// STL and OBJ file I/O.
pub use mesh_io as io;

/// Defect analysis and repair.
pub use mesh_repair as repair;

/// Vertex normals and shading.
pub use mesh_normals as normals;

/// Triangulation, quadrangulation and edge split.
pub use mesh_topology as topology;

/// Centroid and midpoint subdivision.
pub use mesh_subdivide as subdivide;

/// Solidify.
pub use mesh_shell as shell;

/// Decimation and remeshing.
pub use mesh_retopo as retopo;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for mesh processing.
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{Aabb, IndexedMesh, MeshBounds, MeshTopology, Vertex};

    // I/O
    pub use mesh_io::{MeshFormat, load_mesh, save_mesh};

    // Analysis
    pub use mesh_repair::{MeshReport, analyze};

    // Session
    pub use crate::{MeshSession, Operation, OperationReport, PipelineConfig, SessionError, SessionState};
}
