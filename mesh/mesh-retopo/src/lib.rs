//! Decimation and remeshing behind capability traits.
//!
//! Heavy reduction algorithms live outside this crate's control flow. The
//! orchestration here only needs something that implements [`Decimator`] or
//! [`Remesher`] and hands back a new vertex/face buffer, which is validated
//! before it goes any further.
//!
//! - [`simplify`] keeps a fraction of the faces
//! - [`auto_retopology`] chains decimate, remesh and smooth shading
//! - [`ClusterDecimator`] is a built-in vertex-clustering decimator
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_retopo::{auto_retopology, ClusterDecimator, RetopoParams};
//!
//! let params = RetopoParams::default().with_reduction_factor(1.0);
//! let result = auto_retopology(&unit_cube(), &ClusterDecimator::default(), None, &params).unwrap();
//! assert!(result.smoothed);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod backend;
mod cluster;
mod error;
mod pipeline;
mod simplify;

pub use backend::{Decimator, Remesher};
pub use cluster::ClusterDecimator;
pub use error::{RetopoError, RetopoResult};
pub use pipeline::{AutoRetopoResult, RetopoParams, auto_retopology, mean_edge_length};
pub use simplify::{MIN_TARGET_FACES, SimplifyResult, simplify, target_face_count};
