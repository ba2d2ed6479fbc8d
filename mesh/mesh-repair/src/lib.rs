//! Mesh defect analysis and repair.
//!
//! This crate provides tools for:
//! - Defect analysis (open edges, non-manifold faces, duplicates, degenerates, poles)
//! - Vertex welding (merge nearby vertices deterministically)
//! - Degenerate, duplicate and non-manifold face removal
//! - Unreferenced vertex removal
//! - Hole detection and filling
//! - Winding order correction
//! - Connected component analysis and cleanup
//! - Closing a mesh into a watertight manifold through a [`Repairer`] backend
//!
//! Every operation borrows its input and returns a new mesh. A failed
//! operation leaves nothing half-done: the caller keeps its mesh.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_repair::{analyze, repair_mesh, RepairParams};
//!
//! let mesh = IndexedMesh::from_arrays(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     &[[0, 1, 2]],
//! );
//!
//! let report = analyze(&mesh);
//! assert_eq!(report.open_edge_count, 3);
//!
//! let (repaired, summary) = repair_mesh(&mesh, &RepairParams::default());
//! assert!(!summary.had_changes());
//! assert_eq!(repaired, mesh);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod components;
mod defects;
mod error;
pub mod holes;
mod poles;
mod repair;
pub mod repairer;
mod validate;
mod weld;
pub mod winding;

pub use components::{
    CleanupResult, ComponentAnalysis, FaceRemoval, cleanup_components, find_connected_components,
    keep_largest_component,
};
pub use defects::{
    degenerate_faces, duplicate_faces, duplicate_vertex_count, is_watertight, non_manifold_faces,
    open_edges,
};
pub use error::{RepairError, RepairResult};
pub use holes::{BoundaryLoop, HoleFillResult, detect_holes, fill_hole, fill_holes};
pub use poles::{PoleSummary, ValenceClass, classify_poles, vertex_valences};
pub use repair::{
    RepairParams, RepairSummary, remove_degenerate_faces, remove_duplicate_faces,
    remove_non_manifold_faces, remove_unreferenced_vertices, repair_mesh,
};
pub use repairer::{
    HoleFillParams, HoleFillRepairer, ManifoldRepair, RepairWarning, Repairer, repair_to_manifold,
};
pub use validate::{AnalysisOptions, MeshReport, analyze, analyze_with_options};
pub use weld::{WeldResult, weld_vertices};
pub use winding::{
    WindingResult, count_inconsistent_faces, fix_winding_order, orient_inward, orient_outward,
};
