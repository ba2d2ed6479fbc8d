//! The decimate → remesh → smooth composite.

#![allow(clippy::cast_precision_loss)]

use hashbrown::HashSet;
use mesh_normals::smooth_shade;
use mesh_types::{Edge, IndexedMesh, directed_edges};
use tracing::{info, warn};

use crate::backend::{Decimator, Remesher};
use crate::error::{RetopoError, RetopoResult};
use crate::simplify::{SimplifyResult, check_output, simplify};

/// Parameters for [`auto_retopology`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetopoParams {
    /// Fraction of faces to keep in the decimation step, in `(0, 1]`.
    pub reduction_factor: f64,
    /// Edge length handed to the remesher.
    ///
    /// `None` uses the mean edge length of the decimated mesh.
    pub target_edge_length: Option<f64>,
    /// Assign smooth vertex normals to the result.
    pub smooth: bool,
}

impl Default for RetopoParams {
    fn default() -> Self {
        Self {
            reduction_factor: 0.5,
            target_edge_length: None,
            smooth: true,
        }
    }
}

impl RetopoParams {
    /// Keep `factor` of the faces.
    #[must_use]
    pub const fn with_reduction_factor(mut self, factor: f64) -> Self {
        self.reduction_factor = factor;
        self
    }

    /// Fix the remeshing edge length.
    #[must_use]
    pub const fn with_target_edge_length(mut self, length: f64) -> Self {
        self.target_edge_length = Some(length);
        self
    }

    /// Enable or disable the smoothing step.
    #[must_use]
    pub const fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }
}

/// Result of [`auto_retopology`].
#[derive(Debug, Clone)]
pub struct AutoRetopoResult {
    /// The final mesh.
    pub mesh: IndexedMesh,
    /// Decimation step summary.
    pub simplify: SimplifyResult,
    /// Edge length the remesher was asked for, if it ran.
    pub remesh_edge_length: Option<f64>,
    /// Whether smooth normals were assigned.
    pub smoothed: bool,
    /// Vertices whose smooth normal cancelled.
    pub zero_length_normals: Vec<u32>,
}

/// Mean length over the unique undirected edges of `mesh`.
///
/// Returns 0 for a mesh without edges.
#[must_use]
pub fn mean_edge_length(mesh: &IndexedMesh) -> f64 {
    let mut seen = HashSet::new();
    let mut total = 0.0;
    for face in &mesh.faces {
        for (a, b) in directed_edges(face) {
            if a == b || !seen.insert(Edge::new(a, b)) {
                continue;
            }
            let (Some(pa), Some(pb)) = (mesh.vertices.get(a as usize), mesh.vertices.get(b as usize))
            else {
                continue;
            };
            total += (pb.position - pa.position).norm();
        }
    }
    if seen.is_empty() {
        0.0
    } else {
        total / seen.len() as f64
    }
}

/// Decimate, optionally remesh, then smooth.
///
/// The remesher is skipped when `remesher` is `None`. Every backend result
/// is validated before the next step sees it.
///
/// # Errors
///
/// - [`RetopoError::Mesh`] for malformed or empty input
/// - [`RetopoError::InvalidFactor`] / [`RetopoError::InvalidEdgeLength`] for bad parameters
/// - [`RetopoError::InvalidOutput`] when a backend returns a broken mesh
/// - backend failures as reported by the backend
pub fn auto_retopology(
    mesh: &IndexedMesh,
    decimator: &dyn Decimator,
    remesher: Option<&dyn Remesher>,
    params: &RetopoParams,
) -> RetopoResult<AutoRetopoResult> {
    if let Some(length) = params.target_edge_length {
        if length.is_nan() || length <= 0.0 || length.is_infinite() {
            return Err(RetopoError::InvalidEdgeLength(length));
        }
    }

    let simplified = simplify(mesh, decimator, params.reduction_factor)?;
    let mut current = simplified.mesh.clone();

    let mut remesh_edge_length = None;
    if let Some(remesher) = remesher {
        let length = params
            .target_edge_length
            .unwrap_or_else(|| mean_edge_length(&current));
        if length <= 0.0 {
            return Err(RetopoError::InvalidEdgeLength(length));
        }
        let remeshed = remesher.remesh(&current, length)?;
        check_output(remesher.name(), &remeshed)?;
        info!(
            backend = remesher.name(),
            edge_length = length,
            faces = remeshed.faces.len(),
            "Remeshed"
        );
        current = remeshed;
        remesh_edge_length = Some(length);
    }

    let mut zero_length_normals = Vec::new();
    if params.smooth {
        let shaded = smooth_shade(&current)?;
        if !shaded.zero_length.is_empty() {
            warn!(count = shaded.zero_length.len(), "Vertices with cancelled normals");
        }
        zero_length_normals = shaded.zero_length;
        current = shaded.mesh;
    }

    Ok(AutoRetopoResult {
        mesh: current,
        simplify: simplified,
        remesh_edge_length,
        smoothed: params.smooth,
        zero_length_normals,
    })
}
