//! Solidify: thicken a surface into a closed shell.

// Mesh processing uses u32 indices; truncation would only occur for meshes with >4B vertices
#![allow(clippy::cast_possible_truncation)]

use mesh_normals::vertex_normals_area_weighted;
use mesh_types::{Face, IndexedMesh, Vertex};
use tracing::{info, warn};

use crate::error::{ShellError, ShellResult};
use crate::rim::{RimStyle, generate_rim};
use crate::validation::{ShellValidation, validate_shell};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`solidify`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolidifyParams {
    /// Wall thickness, in mesh units. Must be positive. Default: `1.0`
    pub thickness: f64,
    /// Faces stitched along boundary edges. Default: quads
    pub rim: RimStyle,
    /// Check the result for closedness and consistent winding. Default: `true`
    pub validate: bool,
}

impl Default for SolidifyParams {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            rim: RimStyle::Quads,
            validate: true,
        }
    }
}

impl SolidifyParams {
    /// Params with the given thickness.
    #[must_use]
    pub fn with_thickness(thickness: f64) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    /// Set the rim style.
    #[must_use]
    pub const fn with_rim(mut self, rim: RimStyle) -> Self {
        self.rim = rim;
        self
    }

    /// Set whether the result is validated.
    #[must_use]
    pub const fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// Result of [`solidify`].
#[derive(Debug, Clone)]
pub struct SolidifyResult {
    /// The closed shell.
    pub mesh: IndexedMesh,
    /// Vertices of the input; the offset copy starts at this index.
    pub surface_vertex_count: usize,
    /// Boundary edges of the input that were stitched.
    pub boundary_edges: usize,
    /// Faces added along the boundary.
    pub rim_face_count: usize,
    /// Input vertices with no usable normal; their copy sits on top of them.
    pub zero_length_normals: Vec<u32>,
    /// Closedness check, when requested.
    pub validation: Option<ShellValidation>,
}

impl SolidifyResult {
    /// Whether validation ran and found a closed, consistently wound shell.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.validation.as_ref().is_some_and(ShellValidation::is_valid)
    }
}

/// Thicken a surface into a closed shell.
///
/// Every vertex is copied and moved `thickness` against its area-weighted
/// vertex normal, so the wall grows behind the surface. The input faces
/// keep their winding and the copies are reversed, which leaves a shell
/// whose faces all point out of the wall. Each boundary edge of the input
/// is closed with rim faces. A single triangle becomes two caps plus three
/// rim quads.
///
/// # Offset direction
///
/// The copy moves opposite to the vertex normal, not along it. The input
/// surface stays where it is and becomes the outside of the wall. For a
/// closed, outward-facing input the new shell therefore sits inside the
/// original: a cube solidified by `t` gains an inner cube shrunk by `t` on
/// every side. Flip the input's winding first to grow the wall outward.
///
/// # Errors
///
/// - [`ShellError::NonPositiveThickness`] if the thickness is not above
///   zero; the operation does nothing in that case
/// - [`ShellError::Mesh`] if the mesh is invalid or has no faces
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_shell::{solidify, SolidifyParams};
///
/// let triangle = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
///     &[[0, 1, 2]],
/// );
/// let result = solidify(&triangle, &SolidifyParams::with_thickness(1.0)).unwrap();
/// assert_eq!(result.mesh.faces.len(), 5);
/// assert!(result.is_closed());
/// ```
pub fn solidify(mesh: &IndexedMesh, params: &SolidifyParams) -> ShellResult<SolidifyResult> {
    if params.thickness.is_nan() || params.thickness <= 0.0 {
        return Err(ShellError::NonPositiveThickness {
            thickness: params.thickness,
        });
    }
    mesh.require_faces()?;

    let n = mesh.vertices.len();
    let normals = vertex_normals_area_weighted(mesh);
    if !normals.zero_length.is_empty() {
        warn!(
            "{} vertices have no normal and will not be offset",
            normals.zero_length.len()
        );
    }

    let mut vertices = Vec::with_capacity(n * 2);
    vertices.extend(mesh.vertices.iter().map(|v| Vertex::new(v.position)));
    vertices.extend(
        mesh.vertices
            .iter()
            .zip(&normals.normals)
            .map(|(v, normal)| Vertex::new(v.position - normal * params.thickness)),
    );

    let (rim, boundary_edges) = generate_rim(mesh, n, params.rim);
    let rim_face_count = rim.len();

    let offset = n as u32;
    let mut faces: Vec<Face> = Vec::with_capacity(mesh.faces.len() * 2 + rim_face_count);
    faces.extend(mesh.faces.iter().cloned());
    faces.extend(
        mesh.faces
            .iter()
            .map(|face| face.iter().rev().map(|&v| v + offset).collect::<Face>()),
    );
    faces.extend(rim);

    let shell = IndexedMesh::from_parts(vertices, faces);
    let validation = params.validate.then(|| validate_shell(&shell));

    info!(
        boundary_edges,
        rim_face_count,
        "Solidified {} faces into {} at thickness {}",
        mesh.faces.len(),
        shell.faces.len(),
        params.thickness
    );

    Ok(SolidifyResult {
        mesh: shell,
        surface_vertex_count: n,
        boundary_edges,
        rim_face_count,
        zero_length_normals: normals.zero_length,
        validation,
    })
}
