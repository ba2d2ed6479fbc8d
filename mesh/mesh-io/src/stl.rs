//! STL (Stereolithography) file format support.
//!
//! Supports both ASCII and binary STL formats.
//!
//! # Format Detection
//!
//! A file whose length matches `84 + 50 × count` for the count stored at
//! byte 80 is binary, even when its header happens to start with "solid".
//! Otherwise a file starting with "solid" is ASCII; anything else is read
//! as binary and must then be long enough for its declared count.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored, often contains file info)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (often not accurate)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```
//!
//! # Shared corners
//!
//! STL stores every triangle with its own three corners. Corners with
//! bit-identical coordinates are merged while loading, so a closed model
//! comes back as a connected indexed mesh. Near-identical corners are left
//! alone; welding them is a repair step.

use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Point3, Vertex, Vector3};
use smallvec::smallvec;
use tracing::debug;

use crate::error::{IoError, IoResult, read_file};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Builds an indexed mesh from loose triangles, sharing identical corners.
#[derive(Default)]
struct CornerPool {
    mesh: IndexedMesh,
    lookup: HashMap<[u64; 3], u32>,
}

impl CornerPool {
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    #[allow(clippy::cast_possible_truncation)]
    fn corner(&mut self, p: [f64; 3]) -> u32 {
        // -0.0 and 0.0 are the same point
        let key = p.map(|c| (c + 0.0).to_bits());
        let vertices = &mut self.mesh.vertices;
        *self.lookup.entry(key).or_insert_with(|| {
            vertices.push(Vertex::from_coords(p[0], p[1], p[2]));
            (vertices.len() - 1) as u32
        })
    }

    fn triangle(&mut self, corners: [[f64; 3]; 3]) {
        let [a, b, c] = corners.map(|p| self.corner(p));
        self.mesh.faces.push(smallvec![a, b, c]);
    }

    fn finish(self) -> IndexedMesh {
        debug!(
            vertices = self.mesh.vertices.len(),
            faces = self.mesh.faces.len(),
            "Loaded STL"
        );
        self.mesh
    }
}

/// Load a mesh from an STL file.
///
/// Automatically detects ASCII vs binary format.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file content is not valid STL
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    parse_stl(&read_file(path.as_ref())?)
}

/// Parse STL data held in memory.
///
/// # Errors
///
/// Returns [`IoError::InvalidContent`] or [`IoError::InvalidFaceCount`]
/// for malformed data.
pub fn parse_stl(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() >= HEADER_SIZE + 4 {
        let count = declared_count(bytes);
        let expected = (HEADER_SIZE + 4) as u64 + u64::from(count) * TRIANGLE_SIZE as u64;
        if expected == bytes.len() as u64 {
            return parse_binary(bytes, count);
        }
    }

    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    if String::from_utf8_lossy(head).trim_start().starts_with("solid") {
        return parse_ascii(bytes);
    }

    if bytes.len() < HEADER_SIZE + 4 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }
    parse_binary(bytes, declared_count(bytes))
}

fn declared_count(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ])
}

fn parse_binary(bytes: &[u8], count: u32) -> IoResult<IndexedMesh> {
    let body = &bytes[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < count as usize {
        return Err(IoError::InvalidFaceCount {
            expected: count,
            got: u32::try_from(available).unwrap_or(u32::MAX),
        });
    }

    let mut pool = CornerPool::default();
    for (i, chunk) in body.chunks_exact(TRIANGLE_SIZE).take(count as usize).enumerate() {
        // Skip normal (12 bytes), read 3 vertices (36 bytes total)
        let corners = [
            read_vertex(&chunk[12..24]),
            read_vertex(&chunk[24..36]),
            read_vertex(&chunk[36..48]),
        ];
        if corners.iter().flatten().any(|c| !c.is_finite()) {
            return Err(IoError::invalid_content(format!(
                "triangle {i} has a non-finite coordinate"
            )));
        }
        pool.triangle(corners);
    }
    Ok(pool.finish())
}

/// Read a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> [f64; 3] {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    [f64::from(x), f64::from(y), f64::from(z)]
}

fn parse_ascii(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IoError::invalid_content(format!("ASCII STL is not UTF-8: {e}")))?;

    let mut pool = CornerPool::default();
    let mut in_loop = false;
    let mut corners: Vec<[f64; 3]> = Vec::with_capacity(3);

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" => {
                if !in_loop {
                    return Err(IoError::at_line(line_no, "vertex outside of a loop"));
                }
                corners.push(parse_point(parts, line_no)?);
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                let Ok(triangle) = <[[f64; 3]; 3]>::try_from(corners.as_slice()) else {
                    return Err(IoError::at_line(
                        line_no,
                        format!("facet has {} vertices, expected 3", corners.len()),
                    ));
                };
                pool.triangle(triangle);
                corners.clear();
            }
            "endsolid" => break,
            // solid, facet normal: nothing to keep
            _ => {}
        }
    }

    Ok(pool.finish())
}

fn parse_point<'a>(mut parts: impl Iterator<Item = &'a str>, line_no: usize) -> IoResult<[f64; 3]> {
    let mut point = [0.0_f64; 3];
    for c in &mut point {
        let token = parts
            .next()
            .ok_or_else(|| IoError::at_line(line_no, "vertex needs three coordinates"))?;
        *c = token
            .parse()
            .map_err(|e| IoError::at_line(line_no, format!("bad coordinate {token:?}: {e}")))?;
        if !c.is_finite() {
            return Err(IoError::at_line(line_no, "non-finite coordinate"));
        }
    }
    Ok(point)
}

/// Save a mesh to an STL file.
///
/// Polygons are fan-triangulated from their first corner. Facet normals are
/// recomputed from the triangle geometry.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
/// * `binary` - If true, save as binary STL; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if the mesh is invalid or the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{load_stl, save_stl};
///
/// let mesh = load_stl("input.stl").unwrap();
/// save_stl(&mesh, "output.stl", true).unwrap(); // Binary
/// save_stl(&mesh, "output_ascii.stl", false).unwrap(); // ASCII
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    mesh.validate()
        .map_err(|e| IoError::invalid_content(format!("cannot save mesh: {e}")))?;
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_stl(mesh, &mut writer, binary)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as STL to any writer.
///
/// The mesh must already be valid; use [`save_stl`] for checked output.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stl<W: Write>(mesh: &IndexedMesh, writer: W, binary: bool) -> IoResult<()> {
    if binary {
        write_binary(mesh, writer)
    } else {
        write_ascii(mesh, writer)
    }
}

/// Fan triangles of every face as corner positions.
fn triangles(mesh: &IndexedMesh) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
    mesh.faces.iter().flat_map(move |face| {
        let p = move |i: u32| mesh.vertices[i as usize].position;
        (1..face.len().saturating_sub(1)).map(move |k| [p(face[0]), p(face[k]), p(face[k + 1])])
    })
}

fn facet_normal(t: &[Point3<f64>; 3]) -> Vector3<f64> {
    let normal = (t[1] - t[0]).cross(&(t[2] - t[0]));
    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::zeros()
    }
}

/// Save mesh as binary STL.
fn write_binary<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    // Write 80-byte header (padded with spaces)
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL written by mesh-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let count = triangles(mesh).count();
    let count = u32::try_from(count)
        .map_err(|_| IoError::invalid_content("too many triangles for binary STL"))?;
    writer.write_all(&count.to_le_bytes())?;

    for t in triangles(mesh) {
        write_f32s(&mut writer, &facet_normal(&t))?;
        for p in &t {
            write_f32s(&mut writer, &p.coords)?;
        }
        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write three f32s in little-endian.
// Truncation: f64 to f32 is intentional for STL format
#[allow(clippy::cast_possible_truncation)]
fn write_f32s<W: Write>(writer: &mut W, v: &Vector3<f64>) -> IoResult<()> {
    for c in [v.x as f32, v.y as f32, v.z as f32] {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

/// Save mesh as ASCII STL.
fn write_ascii<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;

    for t in triangles(mesh) {
        let n = facet_normal(&t);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for p in &t {
            writeln!(writer, "      vertex {:.9e} {:.9e} {:.9e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{MeshTopology, unit_cube, unit_cube_quads};

    const TRIANGLE: &[u8] = b"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test";

    fn binary(mesh: &IndexedMesh) -> Vec<u8> {
        let mut buf = Vec::new();
        write_stl(mesh, &mut buf, true).unwrap();
        buf
    }

    #[test]
    fn ascii_triangle() {
        let mesh = parse_stl(TRIANGLE).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn binary_cube_shares_corners() {
        let bytes = binary(&unit_cube());
        assert_eq!(bytes.len(), 84 + 12 * 50);
        let mesh = parse_stl(&bytes).unwrap();
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let mesh = parse_stl(&binary(&unit_cube_quads())).unwrap();
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn binary_header_starting_with_solid() {
        let mut bytes = binary(&unit_cube());
        bytes[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&bytes).unwrap().face_count(), 12);
    }

    #[test]
    fn truncated_binary_is_rejected() {
        let mut bytes = binary(&unit_cube());
        bytes.truncate(84 + 5 * 50 + 10);
        let err = parse_stl(&bytes).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidFaceCount {
                expected: 12,
                got: 5
            }
        ));
    }

    #[test]
    fn malformed_ascii_is_invalid_content() {
        let bad = b"solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 zero\n";
        let err = parse_stl(bad).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("line 4"));

        let short = b"solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\n";
        assert!(parse_stl(short).unwrap_err().is_malformed());
    }

    #[test]
    fn tiny_file_is_rejected() {
        assert!(parse_stl(b"abc").unwrap_err().is_malformed());
    }

    #[test]
    fn ascii_output_parses_back() {
        let mut buf = Vec::new();
        write_stl(&unit_cube(), &mut buf, false).unwrap();
        let mesh = parse_stl(&buf).unwrap();
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
    }

    #[test]
    fn negative_zero_is_shared() {
        let text = b"solid z
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
facet normal 0 0 1
outer loop
vertex -0.0 0 0
vertex 0 1 0
vertex -1 0 0
endloop
endfacet
endsolid z";
        let mesh = parse_stl(text).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
    }
}
