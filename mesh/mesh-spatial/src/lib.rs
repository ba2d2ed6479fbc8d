//! Spatial proximity index over vertex positions.
//!
//! [`ProximityIndex`] answers the two queries the mesh operators need:
//!
//! - [`ProximityIndex::within`] - every point within a radius (weld, dedup)
//! - [`ProximityIndex::nearest`] - the closest point (normal transfer)
//!
//! The index is a [`kiddo`] k-d tree, giving expected O(log V) per query
//! whatever the point distribution. Coincident points share one tree entry
//! and positions are indexed in a fixed rotated frame, so flat or
//! axis-aligned inputs (CAD models, planar patches) build a balanced tree.
//!
//! The index is rebuilt per operator invocation and never shared, so it
//! needs no synchronization.
//!
//! # Example
//!
//! ```
//! use mesh_spatial::ProximityIndex;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 1e-7),
//!     Point3::new(5.0, 0.0, 0.0),
//! ];
//! let index = ProximityIndex::build(&points);
//!
//! assert_eq!(index.within(&points[0], 1e-6), vec![0, 1]);
//! assert_eq!(index.nearest(&Point3::new(4.0, 0.0, 0.0)), Some(2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod kdtree;

pub use kdtree::ProximityIndex;
