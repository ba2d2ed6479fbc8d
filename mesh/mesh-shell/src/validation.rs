//! Closed-solid checks for solidify output.

use mesh_repair::{count_inconsistent_faces, degenerate_faces};
use mesh_types::{IndexedMesh, MeshAdjacency};
use tracing::{debug, warn};

/// Area below which a shell face counts as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Result of shell validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellValidation {
    /// Whether every edge is shared by exactly two faces.
    pub is_watertight: bool,
    /// Whether no edge is shared by more than two faces.
    pub is_manifold: bool,
    /// Whether neighboring faces walk shared edges in opposite directions.
    pub has_consistent_winding: bool,
    /// Number of boundary edges.
    pub boundary_edge_count: usize,
    /// Number of non-manifold edges.
    pub non_manifold_edge_count: usize,
    /// Faces with (near) zero area, typically from zero-length normals.
    pub degenerate_face_count: usize,
    /// List of validation issues found.
    pub issues: Vec<ShellIssue>,
}

impl ShellValidation {
    /// Check if the shell passes all validation checks.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_watertight && self.is_manifold && self.has_consistent_winding
    }

    /// Get the total number of issues found.
    #[must_use]
    pub const fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

/// Issues that can be found during shell validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellIssue {
    /// Shell has boundary edges.
    NotWatertight {
        /// Number of boundary edges.
        boundary_edge_count: usize,
    },
    /// Shell has non-manifold edges.
    NonManifold {
        /// Number of non-manifold edges.
        non_manifold_edge_count: usize,
    },
    /// Shell has inconsistent face winding.
    InconsistentWinding,
    /// Shell has degenerate faces.
    DegenerateFaces {
        /// Number of degenerate faces.
        count: usize,
    },
}

impl std::fmt::Display for ShellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotWatertight {
                boundary_edge_count,
            } => write!(
                f,
                "Shell is not watertight ({boundary_edge_count} boundary edges)"
            ),
            Self::NonManifold {
                non_manifold_edge_count,
            } => write!(
                f,
                "Shell is not manifold ({non_manifold_edge_count} non-manifold edges)"
            ),
            Self::InconsistentWinding => write!(f, "Shell has inconsistent face winding order"),
            Self::DegenerateFaces { count } => write!(f, "Shell has {count} degenerate faces"),
        }
    }
}

/// Check that a shell is a closed, consistently wound solid.
#[must_use]
pub fn validate_shell(shell: &IndexedMesh) -> ShellValidation {
    let adjacency = MeshAdjacency::build(&shell.faces);
    let boundary_edge_count = adjacency.boundary_edge_count();
    let non_manifold_edge_count = adjacency.non_manifold_edge_count();
    let has_consistent_winding = count_inconsistent_faces(shell) == 0;
    let degenerate_face_count = degenerate_faces(shell, DEGENERATE_AREA).len();

    let mut issues = Vec::new();
    if boundary_edge_count > 0 {
        issues.push(ShellIssue::NotWatertight {
            boundary_edge_count,
        });
    }
    if non_manifold_edge_count > 0 {
        issues.push(ShellIssue::NonManifold {
            non_manifold_edge_count,
        });
    }
    if !has_consistent_winding {
        issues.push(ShellIssue::InconsistentWinding);
    }
    if degenerate_face_count > 0 {
        issues.push(ShellIssue::DegenerateFaces {
            count: degenerate_face_count,
        });
    }

    for issue in &issues {
        warn!("{issue}");
    }
    debug!("Shell validation found {} issue(s)", issues.len());

    ShellValidation {
        is_watertight: boundary_edge_count == 0 && non_manifold_edge_count == 0,
        is_manifold: non_manifold_edge_count == 0,
        has_consistent_winding,
        boundary_edge_count,
        non_manifold_edge_count,
        degenerate_face_count,
        issues,
    }
}
