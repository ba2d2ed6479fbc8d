//! Closing a mesh into a watertight manifold.
//!
//! [`repair_to_manifold`] owns the bookkeeping: the watertight check before
//! and after, validation of what the backend returns, and turning backend
//! failures into warnings. The backend itself is any [`Repairer`].
//! [`HoleFillRepairer`] is the built-in one.

use mesh_types::{IndexedMesh, MeshAdjacency};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::RepairResult;
use crate::holes::fill_holes;
use crate::repair::{
    remove_degenerate_faces, remove_duplicate_faces, remove_non_manifold_faces,
    remove_unreferenced_vertices,
};
use crate::weld::weld_vertices;
use crate::winding::{fix_winding_order, orient_outward};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A backend that turns an open or broken mesh into a closed one.
///
/// Implementations may change vertex count and ordering. They may also fail
/// to close pathological input; the caller checks the result.
pub trait Repairer {
    /// Short name used in logs and warnings.
    fn name(&self) -> &str;

    /// Produce a repaired copy of `mesh`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot produce a mesh at all.
    fn repair(&self, mesh: &IndexedMesh) -> RepairResult<IndexedMesh>;
}

/// Parameters for [`HoleFillRepairer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HoleFillParams {
    /// Distance threshold for vertex welding. Default: `1e-6`
    pub weld_epsilon: f64,
    /// Faces with area below this are removed first. Default: `1e-12`
    pub degenerate_area_threshold: f64,
    /// Holes with more edges than this stay open. Default: `100_000`
    pub max_hole_edges: usize,
}

impl Default for HoleFillParams {
    fn default() -> Self {
        Self {
            weld_epsilon: 1e-6,
            degenerate_area_threshold: 1e-12,
            max_hole_edges: 100_000,
        }
    }
}

impl HoleFillParams {
    /// Set the vertex welding distance threshold.
    #[must_use]
    pub const fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = epsilon;
        self
    }

    /// Set the degenerate face area threshold.
    #[must_use]
    pub const fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Set the largest hole that will be filled.
    #[must_use]
    pub const fn with_max_hole_edges(mut self, max: usize) -> Self {
        self.max_hole_edges = max;
        self
    }
}

/// Built-in repair backend.
///
/// Runs, in order: degenerate face removal, welding, duplicate face
/// removal, non-manifold face removal, winding fix, hole filling, outward
/// orientation and unreferenced vertex removal.
#[derive(Debug, Clone, Default)]
pub struct HoleFillRepairer {
    /// Parameters for each stage.
    pub params: HoleFillParams,
}

impl HoleFillRepairer {
    /// Create a repairer with the given parameters.
    #[must_use]
    pub const fn new(params: HoleFillParams) -> Self {
        Self { params }
    }
}

impl Repairer for HoleFillRepairer {
    fn name(&self) -> &str {
        "hole-fill"
    }

    fn repair(&self, mesh: &IndexedMesh) -> RepairResult<IndexedMesh> {
        let params = &self.params;
        let mesh = remove_degenerate_faces(mesh, params.degenerate_area_threshold).mesh;
        let mesh = weld_vertices(&mesh, params.weld_epsilon).mesh;
        let mesh = remove_duplicate_faces(&mesh).mesh;
        let mesh = remove_non_manifold_faces(&mesh).mesh;
        let mesh = fix_winding_order(&mesh).mesh;
        let mesh = fill_holes(&mesh, params.max_hole_edges)?.mesh;
        let mesh = orient_outward(&mesh).mesh;
        Ok(remove_unreferenced_vertices(&mesh).0)
    }
}

/// Non-fatal outcome of [`repair_to_manifold`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepairWarning {
    /// The backend ran but the result still has open edges.
    #[error("repair left {open_edges} open edges")]
    NotWatertight {
        /// Open edges remaining in the returned mesh.
        open_edges: usize,
    },

    /// The backend closed every boundary but left edges with three or more faces.
    #[error("repair left {edges} non-manifold edges")]
    NonManifold {
        /// Non-manifold edges remaining in the returned mesh.
        edges: usize,
    },

    /// The backend failed; the returned mesh is an unchanged copy.
    #[error("repairer '{repairer}' failed: {reason}")]
    RepairerFailed {
        /// Name of the backend.
        repairer: String,
        /// Reason for failure.
        reason: String,
    },
}

/// Outcome of [`repair_to_manifold`].
#[derive(Debug, Clone)]
pub struct ManifoldRepair {
    /// Best-effort repaired mesh.
    pub mesh: IndexedMesh,
    /// Whether the input was already watertight (the mesh is then a copy).
    pub was_watertight: bool,
    /// Set when the mesh could not be fully closed.
    pub warning: Option<RepairWarning>,
}

impl ManifoldRepair {
    /// Whether the repair fully succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.warning.is_none()
    }
}

/// Close `mesh` into a watertight surface using `repairer`.
///
/// An already watertight mesh is returned as an unchanged copy. Backend
/// failures and incomplete repairs come back as a [`RepairWarning`] next to
/// the best-effort mesh. A backend that drops every face counts as failed,
/// so the result always has faces.
///
/// # Errors
///
/// Returns an error if the input is empty or references vertices out of
/// range.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_repair::{repair_to_manifold, is_watertight, HoleFillRepairer};
///
/// let mut mesh = unit_cube();
/// mesh.faces.truncate(10);
///
/// let result = repair_to_manifold(&mesh, &HoleFillRepairer::default()).unwrap();
/// assert!(!result.was_watertight);
/// assert!(result.is_clean());
/// assert!(is_watertight(&result.mesh));
/// ```
pub fn repair_to_manifold(
    mesh: &IndexedMesh,
    repairer: &dyn Repairer,
) -> RepairResult<ManifoldRepair> {
    mesh.require_faces()?;

    if MeshAdjacency::build(&mesh.faces).is_watertight() {
        info!("Mesh is already watertight");
        return Ok(ManifoldRepair {
            mesh: mesh.clone(),
            was_watertight: true,
            warning: None,
        });
    }

    let failed = |reason: String| -> RepairResult<ManifoldRepair> {
        warn!("Repairer '{}' failed: {}", repairer.name(), reason);
        Ok(ManifoldRepair {
            mesh: mesh.clone(),
            was_watertight: false,
            warning: Some(RepairWarning::RepairerFailed {
                repairer: repairer.name().to_string(),
                reason,
            }),
        })
    };

    let repaired = match repairer.repair(mesh) {
        Ok(repaired) => repaired,
        Err(err) => return failed(err.to_string()),
    };
    if let Err(err) = repaired.validate() {
        return failed(format!("returned an invalid mesh: {err}"));
    }
    if repaired.faces.is_empty() {
        return failed("removed every face".to_string());
    }

    let adjacency = MeshAdjacency::build(&repaired.faces);
    let open_edges = adjacency.boundary_edge_count();
    let non_manifold = adjacency.non_manifold_edge_count();
    let warning = if open_edges > 0 {
        warn!("Repair left {} open edges", open_edges);
        Some(RepairWarning::NotWatertight { open_edges })
    } else if non_manifold > 0 {
        warn!("Repair left {} non-manifold edges", non_manifold);
        Some(RepairWarning::NonManifold { edges: non_manifold })
    } else {
        info!(
            "Repaired to watertight: {} -> {} faces",
            mesh.faces.len(),
            repaired.faces.len()
        );
        None
    };

    Ok(ManifoldRepair {
        mesh: repaired,
        was_watertight: false,
        warning,
    })
}
