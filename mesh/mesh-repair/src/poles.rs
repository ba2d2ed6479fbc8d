//! Vertex valence and pole classification.
//!
//! In a quad-dominant mesh, interior vertices normally have four incident
//! edges. Any other valence is a *pole*, which matters for subdivision
//! quality and edge-loop flow.

use mesh_types::{IndexedMesh, MeshAdjacency};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Valence bucket of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValenceClass {
    /// No incident edges.
    Unused,
    /// One or two incident edges (boundary corners, dangling faces).
    Sparse,
    /// Three incident edges.
    Three,
    /// Four incident edges.
    Regular,
    /// Five or more incident edges.
    High,
}

impl ValenceClass {
    /// Bucket a valence.
    #[must_use]
    pub const fn from_valence(valence: usize) -> Self {
        match valence {
            0 => Self::Unused,
            1 | 2 => Self::Sparse,
            3 => Self::Three,
            4 => Self::Regular,
            _ => Self::High,
        }
    }

    /// Whether a vertex in this bucket is a pole.
    #[must_use]
    pub const fn is_pole(self) -> bool {
        !matches!(self, Self::Unused | Self::Regular)
    }
}

/// Per-bucket vertex counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoleSummary {
    /// Vertices with no incident edges.
    pub unused: usize,
    /// Vertices with one or two incident edges.
    pub sparse: usize,
    /// Vertices with three incident edges.
    pub three: usize,
    /// Vertices with four incident edges.
    pub regular: usize,
    /// Vertices with five or more incident edges.
    pub high: usize,
}

impl PoleSummary {
    /// Tally a list of classes.
    #[must_use]
    pub fn from_classes(classes: &[ValenceClass]) -> Self {
        let mut summary = Self::default();
        for class in classes {
            match class {
                ValenceClass::Unused => summary.unused += 1,
                ValenceClass::Sparse => summary.sparse += 1,
                ValenceClass::Three => summary.three += 1,
                ValenceClass::Regular => summary.regular += 1,
                ValenceClass::High => summary.high += 1,
            }
        }
        summary
    }

    /// Number of poles.
    #[must_use]
    pub const fn pole_count(&self) -> usize {
        self.sparse + self.three + self.high
    }
}

/// Valence of every vertex (number of distinct incident edges).
#[must_use]
pub fn vertex_valences(mesh: &IndexedMesh) -> Vec<usize> {
    MeshAdjacency::build(&mesh.faces).valences(mesh.vertices.len())
}

/// Valence bucket of every vertex, indexed like `mesh.vertices`.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube_quads;
/// use mesh_repair::{classify_poles, ValenceClass};
///
/// // Every corner of a quad cube has three edges
/// let classes = classify_poles(&unit_cube_quads());
/// assert!(classes.iter().all(|&c| c == ValenceClass::Three));
/// ```
#[must_use]
pub fn classify_poles(mesh: &IndexedMesh) -> Vec<ValenceClass> {
    vertex_valences(mesh)
        .into_iter()
        .map(ValenceClass::from_valence)
        .collect()
}
