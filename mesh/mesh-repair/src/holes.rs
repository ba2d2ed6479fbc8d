//! Hole detection and filling for mesh repair.
//!
//! A hole is a closed loop of boundary edges (edges with only one adjacent
//! face). Loops are traced from directed half-edges, so each loop comes out
//! wound the way a patch closing it must be wound, and a boundary that
//! touches itself at a vertex splits into separate simple loops.

use hashbrown::{HashMap, HashSet};
use mesh_types::{
    Edge, Face, IndexedMesh, MeshAdjacency, Point3, Vector3, Vertex, directed_edges,
};
use tracing::{debug, info, warn};

use crate::error::{RepairError, RepairResult};

/// A boundary loop representing a hole in the mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// Ordered vertex indices, wound as the patch that closes the hole.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if this is a valid boundary loop.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }
}

/// Result of [`fill_holes`].
#[derive(Debug, Clone)]
pub struct HoleFillResult {
    /// The mesh with patches appended. Existing faces keep their indices.
    pub mesh: IndexedMesh,
    /// Number of holes closed.
    pub holes_filled: usize,
    /// Number of holes left open because they exceeded the size limit.
    pub holes_skipped: usize,
    /// Number of triangles added.
    pub faces_added: usize,
}

impl HoleFillResult {
    /// Check if any holes were filled.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.faces_added > 0
    }
}

/// Detect all boundary loops (holes) in the mesh.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_repair::detect_holes;
///
/// let mesh = IndexedMesh::from_arrays(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
///     &[[0, 1, 2]],
/// );
///
/// // A single triangle has one boundary loop, wound opposite to the face
/// let holes = detect_holes(&mesh);
/// assert_eq!(holes.len(), 1);
/// assert_eq!(holes[0].edge_count(), 3);
/// ```
#[must_use]
pub fn detect_holes(mesh: &IndexedMesh) -> Vec<BoundaryLoop> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    detect_holes_in(&mesh.faces, &adjacency)
}

pub(crate) fn detect_holes_in(faces: &[Face], adjacency: &MeshAdjacency) -> Vec<BoundaryLoop> {
    // Each open face edge a -> b becomes hole edge b -> a.
    let mut half_edges: Vec<(u32, u32)> = faces
        .iter()
        .flat_map(|face| directed_edges(face))
        .filter(|&(a, b)| a != b && adjacency.edge_occurrence(Edge::new(a, b)) == 1)
        .map(|(a, b)| (b, a))
        .collect();
    if half_edges.is_empty() {
        return Vec::new();
    }
    half_edges.sort_unstable();
    half_edges.dedup();
    debug!("Found {} boundary edges", half_edges.len());

    let mut outgoing: HashMap<u32, Vec<u32>> = HashMap::new();
    for &(a, b) in &half_edges {
        outgoing.entry(a).or_default().push(b);
    }

    let mut loops = Vec::new();
    for &(start, _) in &half_edges {
        while outgoing.get(&start).is_some_and(|targets| !targets.is_empty()) {
            trace_from(start, &mut outgoing, &mut loops);
        }
    }

    info!(
        "Detected {} holes, sizes: {:?}",
        loops.len(),
        loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>()
    );
    loops
}

/// Walk unused half-edges from `start`, cutting off a simple loop each time
/// the walk returns to a vertex already on the path.
fn trace_from(start: u32, outgoing: &mut HashMap<u32, Vec<u32>>, loops: &mut Vec<BoundaryLoop>) {
    let mut path = vec![start];
    let mut on_path: HashMap<u32, usize> = HashMap::new();
    on_path.insert(start, 0);
    let mut current = start;

    while let Some(next) = outgoing.get_mut(&current).and_then(Vec::pop) {
        if let Some(&at) = on_path.get(&next) {
            let vertices = path[at..].to_vec();
            for v in path.drain(at + 1..) {
                on_path.remove(&v);
            }
            if vertices.len() >= 3 {
                loops.push(BoundaryLoop { vertices });
            } else {
                debug!("Ignoring boundary loop with {} edges", vertices.len());
            }
        } else {
            on_path.insert(next, path.len());
            path.push(next);
        }
        current = next;
    }

    if path.len() > 1 {
        warn!(
            "Boundary chain starting at vertex {} is not closed ({} vertices)",
            start,
            path.len()
        );
    }
}

/// Triangulate one boundary loop by ear clipping.
///
/// Returns triangles wound like the loop. Diagonals that already exist as
/// mesh edges are avoided so the patch does not create non-manifold edges.
///
/// # Errors
///
/// Returns [`RepairError::HoleFillFailed`] if the loop has fewer than three
/// vertices or references a vertex outside the mesh.
pub fn fill_hole(mesh: &IndexedMesh, boundary: &BoundaryLoop) -> RepairResult<Vec<[u32; 3]>> {
    let mut edges: HashSet<Edge> = mesh
        .faces
        .iter()
        .flat_map(|face| directed_edges(face))
        .filter(|&(a, b)| a != b)
        .map(Edge::from)
        .collect();
    triangulate_loop(&mesh.vertices, &boundary.vertices, &mut edges)
}

/// Fill every hole with at most `max_hole_edges` edges.
///
/// The input is not modified; patches are appended to a copy.
///
/// # Errors
///
/// Returns an error if the input mesh references vertices out of range or
/// contains non-finite positions.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube_quads;
/// use mesh_repair::{fill_holes, is_watertight};
///
/// let mut open_box = unit_cube_quads();
/// open_box.faces.pop();
///
/// let result = fill_holes(&open_box, 100).unwrap();
/// assert_eq!(result.holes_filled, 1);
/// assert_eq!(result.faces_added, 2);
/// assert!(is_watertight(&result.mesh));
/// ```
pub fn fill_holes(mesh: &IndexedMesh, max_hole_edges: usize) -> RepairResult<HoleFillResult> {
    mesh.validate()?;
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let holes = detect_holes_in(&mesh.faces, &adjacency);

    let mut edges: HashSet<Edge> = adjacency.edges().map(|(edge, _)| edge).collect();
    let mut filled = mesh.clone();
    let mut holes_filled = 0;
    let mut holes_skipped = 0;
    let mut faces_added = 0;

    for hole in &holes {
        if hole.edge_count() > max_hole_edges {
            warn!(
                "Skipping large hole with {} edges (max: {})",
                hole.edge_count(),
                max_hole_edges
            );
            holes_skipped += 1;
            continue;
        }
        let triangles = triangulate_loop(&mesh.vertices, &hole.vertices, &mut edges)?;
        faces_added += triangles.len();
        filled
            .faces
            .extend(triangles.iter().map(|tri| Face::from_slice(tri)));
        holes_filled += 1;
    }

    if holes_filled > 0 {
        info!("Filled {} holes with {} triangles", holes_filled, faces_added);
    }

    Ok(HoleFillResult {
        mesh: filled,
        holes_filled,
        holes_skipped,
        faces_added,
    })
}

fn triangulate_loop(
    vertices: &[Vertex],
    boundary: &[u32],
    edges: &mut HashSet<Edge>,
) -> RepairResult<Vec<[u32; 3]>> {
    if boundary.len() < 3 {
        return Err(RepairError::HoleFillFailed {
            reason: format!("boundary loop has only {} vertices", boundary.len()),
        });
    }
    if let Some(&bad) = boundary.iter().find(|&&v| v as usize >= vertices.len()) {
        return Err(RepairError::HoleFillFailed {
            reason: format!("boundary vertex {bad} is out of range"),
        });
    }

    let planar = project_loop(vertices, boundary);
    let tolerance = area_tolerance(&planar);
    let mut remaining: Vec<usize> = (0..boundary.len()).collect();
    let mut triangles = Vec::with_capacity(boundary.len() - 2);

    while remaining.len() > 3 {
        let ear = (0..remaining.len()).find(|&i| {
            let n = remaining.len();
            let (prev, curr, next) = (remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]);
            !edges.contains(&Edge::new(boundary[prev], boundary[next]))
                && is_ear(&planar, &remaining, prev, curr, next, tolerance)
        });

        let Some(i) = ear else {
            fan_fill(boundary, &remaining, edges, &mut triangles);
            remaining.clear();
            break;
        };

        let n = remaining.len();
        let tri = [
            boundary[remaining[(i + n - 1) % n]],
            boundary[remaining[i]],
            boundary[remaining[(i + 1) % n]],
        ];
        add_triangle(tri, edges, &mut triangles);
        remaining.remove(i);
    }

    if remaining.len() == 3 {
        add_triangle(
            [
                boundary[remaining[0]],
                boundary[remaining[1]],
                boundary[remaining[2]],
            ],
            edges,
            &mut triangles,
        );
    }

    debug!(
        "Filled hole with {} edges using {} triangles",
        boundary.len(),
        triangles.len()
    );
    Ok(triangles)
}

fn add_triangle(tri: [u32; 3], edges: &mut HashSet<Edge>, triangles: &mut Vec<[u32; 3]>) {
    edges.extend(directed_edges(&tri).map(Edge::from));
    triangles.push(tri);
}

/// Fan the rest of the polygon from the first corner whose diagonals are
/// all new edges.
fn fan_fill(
    boundary: &[u32],
    remaining: &[usize],
    edges: &mut HashSet<Edge>,
    triangles: &mut Vec<[u32; 3]>,
) {
    let n = remaining.len();
    warn!("Ear clipping stuck with {} vertices remaining, using fan triangulation", n);
    let at = |k: usize| boundary[remaining[k % n]];
    let apex = (0..n).find(|&s| (2..n - 1).all(|k| !edges.contains(&Edge::new(at(s), at(s + k)))));
    let apex = apex.unwrap_or_else(|| {
        warn!("No clean fan apex for {}-gon, patch will share an existing edge", n);
        0
    });

    for k in 1..n - 1 {
        add_triangle([at(apex), at(apex + k), at(apex + k + 1)], edges, triangles);
    }
}

/// Project loop positions onto the plane of its Newell normal, oriented so
/// that the loop's own winding is counter-clockwise.
fn project_loop(vertices: &[Vertex], boundary: &[u32]) -> Vec<[f64; 2]> {
    let positions: Vec<Point3<f64>> = boundary
        .iter()
        .map(|&v| vertices[v as usize].position)
        .collect();

    let mut normal = Vector3::zeros();
    for (i, p) in positions.iter().enumerate() {
        let q = positions[(i + 1) % positions.len()];
        normal += p.coords.cross(&q.coords);
    }
    let normal = normal.try_normalize(f64::MIN_POSITIVE).unwrap_or_else(Vector3::z);

    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = helper.cross(&normal).normalize();
    let v = normal.cross(&u);

    let origin = positions[0];
    positions
        .iter()
        .map(|p| {
            let d = p - origin;
            [d.dot(&u), d.dot(&v)]
        })
        .collect()
}

fn area_tolerance(points: &[[f64; 2]]) -> f64 {
    let extent = points
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0_f64, f64::max);
    1e-12 * extent * extent
}

fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn is_ear(
    points: &[[f64; 2]],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    tolerance: f64,
) -> bool {
    let (a, b, c) = (points[prev], points[curr], points[next]);
    if orient(a, b, c) <= tolerance {
        return false;
    }

    remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .map(|&idx| points[idx])
        .filter(|p| *p != a && *p != b && *p != c)
        .all(|p| !point_in_triangle(p, a, b, c))
}

fn point_in_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    let d1 = orient(a, b, p);
    let d2 = orient(b, c, p);
    let d3 = orient(c, a, p);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}
