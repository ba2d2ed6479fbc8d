//! Solidify: turn an open or closed surface into a closed shell.
//!
//! [`solidify`] copies the surface, moves the copy back along the vertex
//! normals by the wall thickness, reverses it, and stitches every boundary
//! edge with rim faces. The result is checked with [`validate_shell`].
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_shell::{solidify, RimStyle, SolidifyParams};
//!
//! let quad = IndexedMesh::from_arrays(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//!     &[[0, 1, 2, 3]],
//! );
//!
//! let params = SolidifyParams::with_thickness(0.2).with_rim(RimStyle::Triangles);
//! let result = solidify(&quad, &params)?;
//!
//! // Two caps plus two triangles per boundary edge
//! assert_eq!(result.mesh.faces.len(), 2 + 8);
//! assert!(result.is_closed());
//! # Ok::<(), mesh_shell::ShellError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod rim;
mod solidify;
mod validation;

pub use error::{ShellError, ShellResult};
pub use rim::{RimStyle, generate_rim};
pub use solidify::{SolidifyParams, SolidifyResult, solidify};
pub use validation::{ShellIssue, ShellValidation, validate_shell};
