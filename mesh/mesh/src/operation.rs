//! Every operator the session can run on its working mesh.

use mesh_normals::{AutoSmoothParams, auto_smooth, smooth_shade, transfer_normals};
use mesh_repair::{
    RepairParams, Repairer, cleanup_components, fill_holes, fix_winding_order, orient_inward,
    orient_outward, remove_degenerate_faces, remove_duplicate_faces, remove_non_manifold_faces,
    remove_unreferenced_vertices, repair_mesh, repair_to_manifold, weld_vertices,
};
use mesh_retopo::{Decimator, Remesher, RetopoParams, auto_retopology, simplify};
use mesh_shell::{SolidifyParams, solidify};
use mesh_subdivide::{SubdivideParams, subdivide_mesh};
use mesh_topology::{edge_split, quadrangulate, triangulate};
use mesh_types::IndexedMesh;
use serde::{Deserialize, Serialize};

use crate::error::{Classified, SessionError, SessionResult};

const fn default_epsilon() -> f64 {
    1e-12
}

/// One step applied to a mesh.
///
/// [`Operation::Repair`] closes the loaded mesh and creates the working
/// mesh; every other operation transforms the working mesh.
///
/// Serialized with an `op` tag, so a TOML pipeline reads:
///
/// ```toml
/// [[operations]]
/// op = "weld"
/// threshold = 1e-6
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Close the loaded mesh into a watertight manifold.
    Repair,
    /// Basic cleanup: degenerates, weld, duplicates, unreferenced vertices.
    Clean(RepairParams),
    /// Merge vertices closer than `threshold`.
    Weld {
        /// Merge distance.
        threshold: f64,
    },
    /// Drop faces with area below `epsilon`.
    RemoveDegenerate {
        /// Area threshold.
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
    /// Drop faces touching edges shared by three or more faces.
    RemoveNonManifold,
    /// Drop repeated faces.
    RemoveDuplicateFaces,
    /// Drop vertices no face uses.
    RemoveUnreferenced,
    /// Fill boundary loops with triangles.
    FillHoles,
    /// Make orientation consistent per component.
    FixWinding,
    /// Point every closed component's normals outward.
    OrientOutward,
    /// Point every closed component's normals inward.
    OrientInward,
    /// Move the bounding-box center to the origin.
    Center,
    /// Assign area-weighted smooth vertex normals.
    SmoothShade,
    /// Split vertices along hard edges and shade each side separately.
    AutoSmooth(AutoSmoothParams),
    /// Copy vertex normals from the loaded mesh onto the working mesh.
    TransferNormals,
    /// Fan-triangulate polygons.
    Triangulate,
    /// Pair triangles into quads, all or nothing.
    Quadrangulate,
    /// Duplicate vertices along edges at or above `angle` degrees.
    EdgeSplit {
        /// Hard-edge threshold in degrees.
        angle: f64,
    },
    /// Give the surface a wall.
    Solidify(SolidifyParams),
    /// Centroid or midpoint subdivision.
    Subdivide(SubdivideParams),
    /// Drop connected components smaller than `min_faces`.
    CleanupComponents {
        /// Smallest component kept.
        min_faces: usize,
    },
    /// Decimate to a fraction of the faces.
    Simplify {
        /// Fraction of faces kept, in `(0, 1]`.
        factor: f64,
    },
    /// Decimate, remesh and smooth.
    AutoRetopology(RetopoParams),
}

impl Operation {
    /// Short operator name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Repair => "repair",
            Self::Clean(_) => "clean",
            Self::Weld { .. } => "weld",
            Self::RemoveDegenerate { .. } => "remove_degenerate",
            Self::RemoveNonManifold => "remove_non_manifold",
            Self::RemoveDuplicateFaces => "remove_duplicate_faces",
            Self::RemoveUnreferenced => "remove_unreferenced",
            Self::FillHoles => "fill_holes",
            Self::FixWinding => "fix_winding",
            Self::OrientOutward => "orient_outward",
            Self::OrientInward => "orient_inward",
            Self::Center => "center",
            Self::SmoothShade => "smooth_shade",
            Self::AutoSmooth(_) => "auto_smooth",
            Self::TransferNormals => "transfer_normals",
            Self::Triangulate => "triangulate",
            Self::Quadrangulate => "quadrangulate",
            Self::EdgeSplit { .. } => "edge_split",
            Self::Solidify(_) => "solidify",
            Self::Subdivide(_) => "subdivide",
            Self::CleanupComponents { .. } => "cleanup_components",
            Self::Simplify { .. } => "simplify",
            Self::AutoRetopology(_) => "auto_retopology",
        }
    }

    /// Whether the result is recentered when the session centers meshes.
    #[must_use]
    pub const fn recenters(&self) -> bool {
        matches!(
            self,
            Self::Repair | Self::Simplify { .. } | Self::AutoRetopology(_)
        )
    }

    /// Whether the operation reads the loaded mesh rather than the working one.
    #[must_use]
    pub const fn reads_loaded_mesh(&self) -> bool {
        matches!(self, Self::Repair)
    }

    /// Run the operator. `mesh` is never modified.
    pub(crate) fn run(&self, mesh: &IndexedMesh, ctx: &OperatorContext<'_>) -> SessionResult<Applied> {
        let name = self.name();
        let applied = match self {
            Self::Repair => {
                let result = repair_to_manifold(mesh, ctx.repairer).map_err(|e| e.into_session_error(name))?;
                let summary = if result.was_watertight {
                    "already watertight".to_string()
                } else {
                    format!(
                        "{} → {} faces, watertight: {}",
                        mesh.faces.len(),
                        result.mesh.faces.len(),
                        result.is_clean()
                    )
                };
                Applied::new(result.mesh, summary)
                    .with_warnings(result.warning.iter().map(ToString::to_string))
            }
            Self::Clean(params) => {
                let (out, summary) = repair_mesh(mesh, params);
                Applied::new(out, summary.to_string())
            }
            Self::Weld { threshold } => {
                let result = weld_vertices(mesh, *threshold);
                let summary = format!(
                    "merged {} vertices, collapsed {} faces",
                    result.vertices_merged, result.faces_collapsed
                );
                Applied::new(result.mesh, summary)
            }
            Self::RemoveDegenerate { epsilon } => {
                let removal = remove_degenerate_faces(mesh, *epsilon);
                let summary = format!("removed {} degenerate faces", removal.faces_removed);
                Applied::new(removal.mesh, summary)
            }
            Self::RemoveNonManifold => {
                let removal = remove_non_manifold_faces(mesh);
                let summary = format!("removed {} non-manifold faces", removal.faces_removed);
                Applied::new(removal.mesh, summary)
            }
            Self::RemoveDuplicateFaces => {
                let removal = remove_duplicate_faces(mesh);
                let summary = format!("removed {} duplicate faces", removal.faces_removed);
                Applied::new(removal.mesh, summary)
            }
            Self::RemoveUnreferenced => {
                let (out, removed) = remove_unreferenced_vertices(mesh);
                Applied::new(out, format!("removed {removed} unreferenced vertices"))
            }
            Self::FillHoles => {
                let result = fill_holes(mesh, ctx.max_hole_edges).map_err(|e| e.into_session_error(name))?;
                let summary = format!(
                    "filled {} holes with {} faces",
                    result.holes_filled, result.faces_added
                );
                let skipped = (result.holes_skipped > 0).then(|| {
                    format!(
                        "{} holes larger than {} edges were left open",
                        result.holes_skipped, ctx.max_hole_edges
                    )
                });
                Applied::new(result.mesh, summary).with_warnings(skipped)
            }
            Self::FixWinding => {
                let result = fix_winding_order(mesh);
                Applied::new(result.mesh, format!("flipped {} faces", result.faces_flipped))
            }
            Self::OrientOutward => {
                let result = orient_outward(mesh);
                Applied::new(result.mesh, format!("flipped {} faces", result.faces_flipped))
            }
            Self::OrientInward => {
                let result = orient_inward(mesh);
                Applied::new(result.mesh, format!("flipped {} faces", result.faces_flipped))
            }
            Self::Center => Applied::new(mesh.centered(), "centered on origin".to_string()),
            Self::SmoothShade => {
                let result = smooth_shade(mesh).map_err(|e| e.into_session_error(name))?;
                Applied::new(result.mesh, "assigned smooth normals".to_string())
                    .with_zero_normals(result.zero_length.len())
            }
            Self::AutoSmooth(params) => {
                let result = auto_smooth(mesh, params).map_err(|e| e.into_session_error(name))?;
                let summary = format!(
                    "{} hard edges, {} vertices split",
                    result.hard_edges, result.vertices_split
                );
                Applied::new(result.mesh, summary).with_zero_normals(result.zero_length.len())
            }
            Self::TransferNormals => {
                let source = ctx
                    .loaded
                    .ok_or_else(|| SessionError::precondition(name, "no loaded mesh to copy normals from"))?;
                let result = transfer_normals(source, mesh).map_err(|e| e.into_session_error(name))?;
                Applied::new(result.mesh, format!("transferred normals by {:?}", result.method))
            }
            Self::Triangulate => {
                let result = triangulate(mesh).map_err(|e| e.into_session_error(name))?;
                let summary = if result.was_noop {
                    "already triangulated".to_string()
                } else {
                    format!(
                        "split {} polygons, dropped {} degenerate faces",
                        result.polygons_split, result.degenerate_removed
                    )
                };
                Applied::new(result.mesh, summary)
            }
            Self::Quadrangulate => {
                let result = quadrangulate(mesh).map_err(|e| e.into_session_error(name))?;
                Applied::new(result.mesh, format!("formed {} quads", result.quads))
            }
            Self::EdgeSplit { angle } => {
                let result = edge_split(mesh, *angle).map_err(|e| e.into_session_error(name))?;
                let summary = format!(
                    "{} hard edges, {} vertices added",
                    result.hard_edges, result.vertices_added
                );
                Applied::new(result.mesh, summary)
            }
            Self::Solidify(params) => {
                let result = solidify(mesh, params).map_err(|e| e.into_session_error(name))?;
                let summary = format!(
                    "{} faces, {} rim faces, closed: {}",
                    result.mesh.faces.len(),
                    result.rim_face_count,
                    result.is_closed()
                );
                let issues = result
                    .validation
                    .iter()
                    .flat_map(|v| v.issues.iter().map(ToString::to_string))
                    .collect::<Vec<_>>();
                Applied::new(result.mesh, summary)
                    .with_warnings(issues)
                    .with_zero_normals(result.zero_length_normals.len())
            }
            Self::Subdivide(params) => {
                let result = subdivide_mesh(mesh, params).map_err(|e| e.into_session_error(name))?;
                let summary = result.to_string();
                let zero = result.zero_length_normals.len();
                Applied::new(result.mesh, summary).with_zero_normals(zero)
            }
            Self::CleanupComponents { min_faces } => {
                let result =
                    cleanup_components(mesh, *min_faces).map_err(|e| e.into_session_error(name))?;
                let summary = format!(
                    "kept {} components, removed {} ({} faces)",
                    result.components_kept, result.components_removed, result.faces_removed
                );
                Applied::new(result.mesh, summary)
            }
            Self::Simplify { factor } => {
                let result = simplify(mesh, ctx.decimator, *factor).map_err(|e| e.into_session_error(name))?;
                let summary = result.to_string();
                Applied::new(result.mesh, summary)
            }
            Self::AutoRetopology(params) => {
                let result = auto_retopology(mesh, ctx.decimator, ctx.remesher, params)
                    .map_err(|e| e.into_session_error(name))?;
                let summary = format!(
                    "{}, remeshed: {}",
                    result.simplify,
                    result.remesh_edge_length.is_some()
                );
                let zero = result.zero_length_normals.len();
                Applied::new(result.mesh, summary).with_zero_normals(zero)
            }
        };
        Ok(applied)
    }
}

/// Backends and settings an operator may need besides its input mesh.
pub(crate) struct OperatorContext<'a> {
    pub loaded: Option<&'a IndexedMesh>,
    pub repairer: &'a dyn Repairer,
    pub decimator: &'a dyn Decimator,
    pub remesher: Option<&'a dyn Remesher>,
    pub max_hole_edges: usize,
}

/// What a successful operator hands back to the session.
pub(crate) struct Applied {
    pub mesh: IndexedMesh,
    pub summary: String,
    pub warnings: Vec<String>,
}

impl Applied {
    const fn new(mesh: IndexedMesh, summary: String) -> Self {
        Self {
            mesh,
            summary,
            warnings: Vec::new(),
        }
    }

    fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    fn with_zero_normals(self, count: usize) -> Self {
        let warning = (count > 0).then(|| format!("{count} vertices have a zero-length normal"));
        self.with_warnings(warning)
    }
}
