//! Mesh subdivision.
//!
//! Two schemes, both leaving existing vertices where they are:
//!
//! - **Centroid** (default): every n-gon becomes n quads meeting at a new
//!   centroid vertex, with shared edge midpoints. This produces the
//!   topology of Catmull-Clark but not its smoothing, so the surface shape
//!   is unchanged.
//! - **Midpoint**: every triangle becomes 4 through its edge midpoints.
//!
//! Iterations compose on the previous output, and area-weighted vertex
//! normals are recomputed at the end unless disabled.
//!
//! # Examples
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_subdivide::{subdivide_mesh, SubdivideParams};
//!
//! let mesh = IndexedMesh::from_arrays(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]],
//!     &[[0, 1, 2]],
//! );
//!
//! // 1 * 4^2 = 16 faces after 2 iterations
//! let params = SubdivideParams::midpoint().with_iterations(2);
//! let result = subdivide_mesh(&mesh, &params)?;
//! assert_eq!(result.final_faces, 16);
//! # Ok::<(), mesh_subdivide::SubdivideError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod params;
mod result;
mod subdivide;

pub use error::{SubdivideError, SubdivideResult};
pub use params::{SubdivideParams, SubdivisionMethod};
pub use result::SubdivisionResult;
pub use subdivide::subdivide_mesh;
