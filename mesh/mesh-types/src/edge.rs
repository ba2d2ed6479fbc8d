//! Canonical undirected edges.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unordered pair of vertex indices, stored as `(min, max)`.
///
/// The canonical ordering makes `Edge` usable as a hash key: the edge
/// `1→4` of one face and `4→1` of its neighbour map to the same key.
///
/// # Example
///
/// ```
/// use mesh_types::Edge;
///
/// assert_eq!(Edge::new(4, 1), Edge::new(1, 4));
/// assert_eq!(Edge::new(4, 1).vertices(), (1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    a: u32,
    b: u32,
}

impl Edge {
    /// Create a canonical edge from two vertex indices in any order.
    #[inline]
    #[must_use]
    pub const fn new(v0: u32, v1: u32) -> Self {
        if v0 <= v1 {
            Self { a: v0, b: v1 }
        } else {
            Self { a: v1, b: v0 }
        }
    }

    /// The smaller vertex index.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.a
    }

    /// The larger vertex index.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.b
    }

    /// Both endpoints as `(min, max)`.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> (u32, u32) {
        (self.a, self.b)
    }

    /// Check whether `v` is an endpoint.
    #[inline]
    #[must_use]
    pub const fn contains(&self, v: u32) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint opposite `v`, or `None` if `v` is not on this edge.
    #[inline]
    #[must_use]
    pub const fn other(&self, v: u32) -> Option<u32> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }

    /// Whether both endpoints are the same vertex.
    #[inline]
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.a == self.b
    }
}

impl From<(u32, u32)> for Edge {
    fn from((v0, v1): (u32, u32)) -> Self {
        Self::new(v0, v1)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}
