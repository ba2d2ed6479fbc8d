//! Reduction-factor simplification on top of a [`Decimator`].

// Face counts are far below 2^52
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use mesh_types::IndexedMesh;
use tracing::info;

use crate::backend::Decimator;
use crate::error::{RetopoError, RetopoResult};

/// Fewest faces [`simplify`] asks a decimator for.
pub const MIN_TARGET_FACES: usize = 4;

/// Result of [`simplify`].
#[derive(Debug, Clone)]
pub struct SimplifyResult {
    /// The decimated mesh.
    pub mesh: IndexedMesh,
    /// Faces in the input.
    pub original_faces: usize,
    /// Face count requested from the decimator.
    pub target_faces: usize,
    /// Faces in the output.
    pub final_faces: usize,
}

impl SimplifyResult {
    /// Output faces over input faces.
    #[must_use]
    pub fn reduction_ratio(&self) -> f64 {
        if self.original_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.original_faces as f64
        }
    }
}

impl std::fmt::Display for SimplifyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Simplify: {} → {} faces (target {}, {:.1}% kept)",
            self.original_faces,
            self.final_faces,
            self.target_faces,
            self.reduction_ratio() * 100.0
        )
    }
}

/// Face count [`simplify`] requests for `faces` input faces.
///
/// `floor(faces * factor)`, but never below [`MIN_TARGET_FACES`].
#[must_use]
pub fn target_face_count(faces: usize, factor: f64) -> usize {
    ((faces as f64 * factor).floor() as usize).max(MIN_TARGET_FACES)
}

/// Decimate `mesh` to `factor` of its faces.
///
/// The decimator's output is checked before it is returned: out-of-range
/// indices, non-finite positions or an empty result are reported as an
/// error instead of reaching the caller.
///
/// # Errors
///
/// - [`RetopoError::Mesh`] if the input is invalid or empty
/// - [`RetopoError::InvalidFactor`] if `factor` is not in `(0, 1]`
/// - [`RetopoError::InvalidOutput`] if the decimator returns a broken mesh
/// - whatever the decimator itself reports
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_retopo::{simplify, ClusterDecimator};
///
/// let result = simplify(&unit_cube(), &ClusterDecimator::default(), 1.0).unwrap();
/// assert_eq!(result.final_faces, 12);
/// ```
pub fn simplify(
    mesh: &IndexedMesh,
    decimator: &dyn Decimator,
    factor: f64,
) -> RetopoResult<SimplifyResult> {
    mesh.require_faces()?;
    if factor.is_nan() || factor <= 0.0 || factor > 1.0 {
        return Err(RetopoError::InvalidFactor(factor));
    }

    let original_faces = mesh.faces.len();
    let target_faces = target_face_count(original_faces, factor);
    let decimated = decimator.decimate(mesh, target_faces)?;
    check_output(decimator.name(), &decimated)?;

    let result = SimplifyResult {
        original_faces,
        target_faces,
        final_faces: decimated.faces.len(),
        mesh: decimated,
    };
    info!(backend = decimator.name(), "{result}");
    Ok(result)
}

/// Reject backend output that is not a usable mesh.
pub(crate) fn check_output(backend: &str, mesh: &IndexedMesh) -> RetopoResult<()> {
    mesh.require_faces()
        .map_err(|source| RetopoError::InvalidOutput {
            backend: backend.to_string(),
            source,
        })
}
