//! Face orientation consistency.
//!
//! Orientation spreads across manifold edges by flood fill: two faces that
//! share an edge agree when they traverse it in opposite directions.
//! Non-manifold edges do not carry orientation, and a non-orientable surface
//! keeps whatever the flood fill reached first.

use std::collections::VecDeque;

use mesh_types::{Face, IndexedMesh, MeshAdjacency, Vertex, directed_edges};
use tracing::{debug, info};

/// Result of an orientation pass.
#[derive(Debug, Clone)]
pub struct WindingResult {
    /// The reoriented mesh. Vertices are untouched.
    pub mesh: IndexedMesh,
    /// Number of faces whose winding was reversed.
    pub faces_flipped: usize,
}

impl WindingResult {
    /// Check if any face was flipped.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.faces_flipped > 0
    }
}

/// Make face winding consistent within every connected patch.
///
/// Each patch keeps the orientation held by the majority of its faces.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_repair::fix_winding_order;
///
/// let mut mesh = unit_cube();
/// mesh.faces[0].reverse();
///
/// let result = fix_winding_order(&mesh);
/// assert_eq!(result.faces_flipped, 1);
/// assert_eq!(result.mesh, unit_cube());
/// ```
#[must_use]
pub fn fix_winding_order(mesh: &IndexedMesh) -> WindingResult {
    let plan = plan_orientation(&mesh.faces);
    apply(mesh, &plan.flips)
}

/// Make winding consistent, then turn every patch so it encloses positive
/// volume.
///
/// Vertex normals are not recomputed.
#[must_use]
pub fn orient_outward(mesh: &IndexedMesh) -> WindingResult {
    orient(mesh, 1.0)
}

/// Make winding consistent, then turn every patch so its normals face
/// inward.
#[must_use]
pub fn orient_inward(mesh: &IndexedMesh) -> WindingResult {
    orient(mesh, -1.0)
}

/// Number of faces [`fix_winding_order`] would flip.
#[must_use]
pub fn count_inconsistent_faces(mesh: &IndexedMesh) -> usize {
    plan_orientation(&mesh.faces)
        .flips
        .iter()
        .filter(|&&flip| flip)
        .count()
}

fn orient(mesh: &IndexedMesh, sign: f64) -> WindingResult {
    let mut plan = plan_orientation(&mesh.faces);
    for patch in &plan.patches {
        let volume: f64 = patch
            .iter()
            .map(|&f| {
                let v = fan_volume(&mesh.vertices, &mesh.faces[f]);
                if plan.flips[f] { -v } else { v }
            })
            .sum();
        if volume * sign < 0.0 {
            debug!(faces = patch.len(), volume, "Turning patch over");
            for &f in patch {
                plan.flips[f] = !plan.flips[f];
            }
        }
    }
    apply(mesh, &plan.flips)
}

struct OrientationPlan {
    flips: Vec<bool>,
    patches: Vec<Vec<usize>>,
}

fn plan_orientation(faces: &[Face]) -> OrientationPlan {
    let adjacency = MeshAdjacency::build(faces);
    let mut flips = vec![false; faces.len()];
    let mut visited = vec![false; faces.len()];
    let mut patches = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..faces.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        queue.push_back(seed);
        let mut patch = Vec::new();

        while let Some(f) = queue.pop_front() {
            patch.push(f);
            for (a, b) in directed_edges(&faces[f]) {
                if a == b {
                    continue;
                }
                // Direction of this edge as f will be wound after the fix
                let (a, b) = if flips[f] { (b, a) } else { (a, b) };
                let sharing = adjacency.faces_for_edge(a, b);
                if sharing.len() != 2 {
                    continue;
                }
                let g = if sharing[0] == f { sharing[1] } else { sharing[0] };
                if g == f || visited[g] {
                    continue;
                }
                visited[g] = true;
                flips[g] = directed_edges(&faces[g]).any(|edge| edge == (a, b));
                queue.push_back(g);
            }
        }

        let flipped = patch.iter().filter(|&&f| flips[f]).count();
        if flipped * 2 > patch.len() {
            for &f in &patch {
                flips[f] = !flips[f];
            }
        }
        patches.push(patch);
    }

    OrientationPlan { flips, patches }
}

fn apply(mesh: &IndexedMesh, flips: &[bool]) -> WindingResult {
    let mut result = mesh.clone();
    let mut faces_flipped = 0;
    for (face, _) in result.faces.iter_mut().zip(flips).filter(|(_, flip)| **flip) {
        face.reverse();
        faces_flipped += 1;
    }
    if faces_flipped > 0 {
        info!("Flipped {} faces to fix winding", faces_flipped);
    }
    WindingResult {
        mesh: result,
        faces_flipped,
    }
}

/// Signed volume contribution of one face, fanned from its first vertex.
fn fan_volume(vertices: &[Vertex], face: &[u32]) -> f64 {
    let Some((&first, rest)) = face.split_first() else {
        return 0.0;
    };
    let p0 = vertices[first as usize].position.coords;
    rest.windows(2)
        .map(|pair| {
            let p1 = vertices[pair[0] as usize].position.coords;
            let p2 = vertices[pair[1] as usize].position.coords;
            p0.dot(&p1.cross(&p2)) / 6.0
        })
        .sum()
}
