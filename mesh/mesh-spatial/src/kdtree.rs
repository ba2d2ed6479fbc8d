//! k-d tree backed proximity index.

use std::fmt;

use hashbrown::HashMap;
use kiddo::{KdTree, SquaredEuclidean};
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, Rotation3};
use tracing::debug;

/// Relative slack added to tree queries to absorb rounding from the frame
/// rotation. Every candidate is re-checked against the exact positions.
const QUERY_SLACK: f64 = 1e-12;

/// Nearest-neighbour and radius queries over a fixed point set.
///
/// Coincident points share one tree entry. Points are stored in a fixed
/// rotated frame so that planar and axis-aligned inputs (CAD models, flat
/// patches) do not pile many equal coordinates into one tree bucket.
/// Distances are rotation invariant; results are always decided on the
/// original positions.
pub struct ProximityIndex {
    points: Vec<Point3<f64>>,
    /// Point indices per distinct position; tree items index into this.
    slots: Vec<Vec<u32>>,
    tree: KdTree<f64, 3>,
    frame: Rotation3<f64>,
    slack: f64,
}

impl fmt::Debug for ProximityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximityIndex")
            .field("points", &self.points.len())
            .field("distinct", &self.slots.len())
            .finish_non_exhaustive()
    }
}

impl ProximityIndex {
    /// Build an index over `points`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: point counts are bounded by u32 mesh indices
    pub fn build(points: &[Point3<f64>]) -> Self {
        let frame = Rotation3::from_euler_angles(0.571, 1.137, 0.293);
        let mut tree: KdTree<f64, 3> = KdTree::new();
        let mut slots: Vec<Vec<u32>> = Vec::new();
        let mut by_position: HashMap<[u64; 3], usize> = HashMap::with_capacity(points.len());
        let mut max_coord: f64 = 0.0;

        for (idx, point) in points.iter().enumerate() {
            max_coord = max_coord.max(point.coords.amax());
            // -0.0 and 0.0 are the same position
            let key = [point.x, point.y, point.z].map(|c| (c + 0.0).to_bits());
            let slot = *by_position.entry(key).or_insert_with(|| {
                let q = frame * point;
                tree.add(&[q.x, q.y, q.z], slots.len() as u64);
                slots.push(Vec::new());
                slots.len() - 1
            });
            slots[slot].push(idx as u32);
        }

        debug!(
            points = points.len(),
            distinct = slots.len(),
            "Built proximity index"
        );

        Self {
            points: points.to_vec(),
            slots,
            tree,
            frame,
            slack: QUERY_SLACK * (1.0 + max_coord),
        }
    }

    /// Build an index over vertex positions.
    #[must_use]
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let points: Vec<_> = vertices.iter().map(|v| v.position).collect();
        Self::build(&points)
    }

    /// Build an index over a mesh's vertices.
    #[must_use]
    pub fn for_mesh(mesh: &IndexedMesh) -> Self {
        Self::from_vertices(&mesh.vertices)
    }

    /// Number of indexed points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the index holds no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct positions.
    #[inline]
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.slots.len()
    }

    /// Indices of every point at distance `<= radius` from `point`, ascending.
    ///
    /// A negative or NaN radius matches nothing. A zero radius matches
    /// exact coincidences only.
    #[must_use]
    pub fn within(&self, point: &Point3<f64>, radius: f64) -> Vec<usize> {
        if self.points.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        let mut found: Vec<usize> = self
            .candidates(point, radius)
            .filter(|&idx| (self.points[idx] - point).norm_squared() <= radius_sq)
            .collect();
        found.sort_unstable();
        found
    }

    /// Index of the closest point, or `None` when the index is empty.
    ///
    /// Ties resolve to the lowest index.
    #[must_use]
    pub fn nearest(&self, point: &Point3<f64>) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let q = self.frame * point;
        let hit = self.tree.nearest_one::<SquaredEuclidean>(&[q.x, q.y, q.z]);
        #[allow(clippy::cast_possible_truncation)]
        let first = *self.slots.get(hit.item as usize)?.first()? as usize;
        let reach = (self.points[first] - point).norm();

        // Rounding in the rotated frame may hide an equally close point
        self.candidates(point, reach)
            .map(|idx| ((self.points[idx] - point).norm_squared(), idx))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, idx)| idx)
    }

    /// Every point whose rotated position is within `radius` plus slack.
    fn candidates(&self, point: &Point3<f64>, radius: f64) -> impl Iterator<Item = usize> + '_ {
        let q = self.frame * point;
        let reach = radius + self.slack + QUERY_SLACK * point.coords.amax();
        self.tree
            .within::<SquaredEuclidean>(&[q.x, q.y, q.z], reach * reach)
            .into_iter()
            .filter_map(|hit| usize::try_from(hit.item).ok())
            .filter_map(|slot| self.slots.get(slot))
            .flat_map(|members| members.iter().map(|&idx| idx as usize))
    }

    #[cfg(test)]
    fn nearest_linear(&self, point: &Point3<f64>) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| ((p - point).norm_squared(), i))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, i)| i)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_points() -> impl Strategy<Value = Vec<Point3<f64>>> {
        prop::collection::vec(
            (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0).prop_map(|(x, y, z)| Point3::new(x, y, z)),
            1..80,
        )
    }

    proptest! {
        #[test]
        fn within_matches_brute_force(points in arb_points(), radius in 0.0f64..5.0) {
            let index = ProximityIndex::build(&points);
            let query = points[0];
            let expected: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| (*p - query).norm_squared() <= radius * radius)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(index.within(&query, radius), expected);
        }

        #[test]
        fn nearest_matches_brute_force(points in arb_points(), qx in -12.0f64..12.0, qy in -12.0f64..12.0) {
            let index = ProximityIndex::build(&points);
            let query = Point3::new(qx, qy, 0.0);
            let expected = index.nearest_linear(&query);
            prop_assert_eq!(index.nearest(&query), expected);
        }
    }
}
