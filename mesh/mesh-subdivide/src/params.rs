//! Subdivision parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Subdivision scheme to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubdivisionMethod {
    /// Centroid/midpoint split: every n-gon becomes n quads around a new
    /// centroid vertex. Works on any polygon. Positions are not smoothed,
    /// so this approximates Catmull-Clark topology without its averaging.
    #[default]
    Centroid,

    /// Triangle midpoint split: every triangle becomes 4.
    /// Requires an all-triangle mesh.
    Midpoint,
}

/// Parameters for mesh subdivision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SubdivideParams {
    /// Subdivision method to use.
    pub method: SubdivisionMethod,

    /// Number of subdivision iterations.
    pub iterations: u32,

    /// Maximum faces allowed in result (prevents memory issues).
    pub max_faces: usize,

    /// Assign area-weighted vertex normals to the result.
    pub recompute_normals: bool,
}

impl Default for SubdivideParams {
    fn default() -> Self {
        Self {
            method: SubdivisionMethod::default(),
            iterations: 1,
            max_faces: 10_000_000, // 10M faces max
            recompute_normals: true,
        }
    }
}

impl SubdivideParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parameters for centroid subdivision.
    #[must_use]
    pub fn centroid() -> Self {
        Self {
            method: SubdivisionMethod::Centroid,
            ..Self::default()
        }
    }

    /// Create parameters for triangle midpoint subdivision.
    #[must_use]
    pub fn midpoint() -> Self {
        Self {
            method: SubdivisionMethod::Midpoint,
            ..Self::default()
        }
    }

    /// Set subdivision method.
    #[must_use]
    pub const fn with_method(mut self, method: SubdivisionMethod) -> Self {
        self.method = method;
        self
    }

    /// Set number of iterations.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set maximum faces allowed.
    #[must_use]
    pub const fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }

    /// Set whether normals are recomputed.
    #[must_use]
    pub const fn with_recompute_normals(mut self, recompute: bool) -> Self {
        self.recompute_normals = recompute;
        self
    }

    /// Face count after one iteration on faces with `corners` corners in total.
    ///
    /// Centroid makes one quad per corner; midpoint makes four triangles
    /// per triangle.
    #[must_use]
    pub const fn faces_after_step(&self, faces: usize, corners: usize) -> usize {
        match self.method {
            SubdivisionMethod::Centroid => corners,
            SubdivisionMethod::Midpoint => faces.saturating_mul(4),
        }
    }
}
