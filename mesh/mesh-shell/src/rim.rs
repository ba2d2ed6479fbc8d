//! Rim faces closing the gap between a surface and its offset copy.
//!
//! Every boundary edge of the surface becomes one quad (or two triangles)
//! joining it to the same edge on the copy.

// Mesh processing uses u32 indices; truncation would only occur for meshes with >4B vertices
#![allow(clippy::cast_possible_truncation)]

use mesh_types::{Face, IndexedMesh, MeshAdjacency, directed_edges};
use smallvec::smallvec;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of the faces stitched along each boundary edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RimStyle {
    /// One quad per boundary edge.
    #[default]
    Quads,
    /// Two triangles per boundary edge.
    Triangles,
}

impl RimStyle {
    /// Faces emitted per boundary edge.
    #[must_use]
    pub const fn faces_per_edge(self) -> usize {
        match self {
            Self::Quads => 1,
            Self::Triangles => 2,
        }
    }
}

/// Rim faces for `mesh` whose copy starts at vertex `offset`.
///
/// Boundary edges are taken in the direction their face walks them. For
/// an edge `a -> b` the rim runs `b, a, a', b'`, which walks `a -> b`
/// backwards and the copy's reversed edge `a' -> b'` forwards, so the rim
/// is wound consistently with the surface and with the reversed copy.
///
/// Returns the rim faces and the number of boundary edges.
#[must_use]
pub fn generate_rim(mesh: &IndexedMesh, offset: usize, style: RimStyle) -> (Vec<Face>, usize) {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let offset = offset as u32;

    let mut rim = Vec::new();
    let mut boundary = 0;
    for face in &mesh.faces {
        for (a, b) in directed_edges(face) {
            if a == b || adjacency.faces_for_edge(a, b).len() != 1 {
                continue;
            }
            boundary += 1;
            let (a2, b2) = (a + offset, b + offset);
            match style {
                RimStyle::Quads => rim.push(smallvec![b, a, a2, b2]),
                RimStyle::Triangles => {
                    rim.push(smallvec![b, a, a2]);
                    rim.push(smallvec![b, a2, b2]);
                }
            }
        }
    }

    debug!("Generated {} rim faces for {} boundary edges", rim.len(), boundary);
    (rim, boundary)
}
