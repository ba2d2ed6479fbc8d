//! Smooth/hard classification of edges by dihedral angle.
//!
//! An interior edge is hard when the angle between its two face normals is
//! at least the threshold. A threshold of 0 therefore makes every shared
//! edge hard, even between coplanar faces.

use hashbrown::HashMap;
use mesh_types::{Edge, IndexedMesh, MeshIndex, Vector3};
use tracing::debug;

use crate::error::{NormalsError, NormalsResult};

/// Angle between two unit normals, in degrees.
///
/// # Example
///
/// ```
/// use mesh_types::Vector3;
/// use mesh_normals::dihedral_angle_degrees;
///
/// let angle = dihedral_angle_degrees(&Vector3::z(), &Vector3::x());
/// assert!((angle - 90.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn dihedral_angle_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// How an edge behaves for shading and splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Used by one face.
    Boundary,
    /// Shared by two faces meeting below the threshold angle, or by a
    /// degenerate face with no usable normal.
    Smooth,
    /// Shared by two faces meeting at or above the threshold angle.
    Hard,
    /// Shared by three or more faces.
    NonManifold,
}

impl EdgeKind {
    /// Whether shading must be discontinuous across this edge.
    #[must_use]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard | Self::NonManifold)
    }
}

/// Classification of every edge of one mesh.
#[derive(Debug, Clone)]
pub struct EdgeClassification {
    kinds: HashMap<Edge, EdgeKind>,
    threshold_degrees: f64,
}

impl EdgeClassification {
    /// Threshold used for the classification, in degrees.
    #[must_use]
    pub const fn threshold_degrees(&self) -> f64 {
        self.threshold_degrees
    }

    /// Kind of an edge, or `None` if no face uses it.
    #[must_use]
    pub fn kind(&self, edge: Edge) -> Option<EdgeKind> {
        self.kinds.get(&edge).copied()
    }

    /// Whether an edge is hard. Unknown edges are not.
    #[must_use]
    pub fn is_hard(&self, edge: Edge) -> bool {
        self.kind(edge).is_some_and(EdgeKind::is_hard)
    }

    /// All hard edges, sorted.
    #[must_use]
    pub fn hard_edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .kinds
            .iter()
            .filter(|(_, kind)| kind.is_hard())
            .map(|(&edge, _)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Number of edges of a given kind.
    #[must_use]
    pub fn count(&self, kind: EdgeKind) -> usize {
        self.kinds.values().filter(|&&k| k == kind).count()
    }

    /// Number of hard edges, non-manifold ones included.
    #[must_use]
    pub fn hard_edge_count(&self) -> usize {
        self.kinds.values().filter(|k| k.is_hard()).count()
    }
}

/// Classify every edge of `mesh` against `threshold_degrees`.
///
/// # Errors
///
/// Returns an error if the mesh references vertices out of range or the
/// threshold is NaN.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_normals::{classify_edges, EdgeKind};
///
/// let edges = classify_edges(&unit_cube(), 30.0).unwrap();
/// // Twelve cube edges are hard; the six face diagonals are flat
/// assert_eq!(edges.count(EdgeKind::Hard), 12);
/// assert_eq!(edges.count(EdgeKind::Smooth), 6);
/// ```
pub fn classify_edges(mesh: &IndexedMesh, threshold_degrees: f64) -> NormalsResult<EdgeClassification> {
    mesh.validate()?;
    check_angle(threshold_degrees)?;
    Ok(classify_in(&MeshIndex::new(mesh), threshold_degrees))
}

pub(crate) fn check_angle(degrees: f64) -> NormalsResult<()> {
    if degrees.is_nan() {
        return Err(NormalsError::InvalidAngle { degrees });
    }
    Ok(())
}

pub(crate) fn classify_in(index: &MeshIndex<'_>, threshold_degrees: f64) -> EdgeClassification {
    let normals = index.face_normals();
    let kinds: HashMap<Edge, EdgeKind> = index
        .adjacency()
        .edges()
        .map(|(edge, faces)| {
            let kind = match *faces {
                [_] => EdgeKind::Boundary,
                [f, g] => match (normals[f], normals[g]) {
                    (Some(a), Some(b)) if dihedral_angle_degrees(&a, &b) >= threshold_degrees => {
                        EdgeKind::Hard
                    }
                    _ => EdgeKind::Smooth,
                },
                _ => EdgeKind::NonManifold,
            };
            (edge, kind)
        })
        .collect();

    let classification = EdgeClassification {
        kinds,
        threshold_degrees,
    };
    debug!(
        threshold_degrees,
        hard = classification.hard_edge_count(),
        "Classified edges"
    );
    classification
}
