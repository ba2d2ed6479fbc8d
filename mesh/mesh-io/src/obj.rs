//! Wavefront OBJ support.
//!
//! Only geometry is read: `v` positions, `vn` normals and `f` polygon faces
//! of any size. Texture coordinates, groups, materials and smoothing groups
//! are skipped. Face corners may use any of the `v`, `v/vt`, `v/vt/vn` and
//! `v//vn` forms, with negative indices counting back from the most recent
//! vertex.
//!
//! A vertex referenced with a `vn` index takes that normal. Positions are
//! written with the shortest representation that round-trips exactly.

use std::io::{BufWriter, Write};
use std::path::Path;

use mesh_types::{Face, IndexedMesh, Vector3, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult, read_file};

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid OBJ.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_obj;
///
/// let mesh = load_obj("model.obj").unwrap();
/// println!("Loaded {} polygons", mesh.faces.len());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let bytes = read_file(path.as_ref())?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| IoError::invalid_content(format!("OBJ is not UTF-8: {e}")))?;
    parse_obj(text)
}

/// Parse OBJ text held in memory.
///
/// # Errors
///
/// Returns [`IoError::InvalidContent`] naming the offending line.
pub fn parse_obj(text: &str) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut normals: Vec<Vector3<f64>> = Vec::new();
    // Source line of each face; positive indices are range-checked at the end
    let mut face_lines: Vec<usize> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or_default();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let [x, y, z] = parse_triple(&mut parts, line_no)?;
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_triple(&mut parts, line_no)?;
                normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                let mut face = Face::new();
                for corner in parts {
                    let (v, vn) = parse_corner(corner, mesh.vertices.len(), normals.len(), line_no)?;
                    if let Some(n) = vn {
                        if let Some(vertex) = mesh.vertices.get_mut(v as usize) {
                            vertex.normal = Some(normals[n]);
                        }
                    }
                    face.push(v);
                }
                if face.len() < 3 {
                    return Err(IoError::at_line(
                        line_no,
                        format!("face has {} corners, expected at least 3", face.len()),
                    ));
                }
                mesh.faces.push(face);
                face_lines.push(line_no);
            }
            _ => {}
        }
    }

    let vertex_count = mesh.vertices.len();
    for (face, &line_no) in mesh.faces.iter().zip(&face_lines) {
        if let Some(&v) = face.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(IoError::at_line(
                line_no,
                format!("vertex {} does not exist ({vertex_count} defined)", u64::from(v) + 1),
            ));
        }
    }

    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Loaded OBJ"
    );
    Ok(mesh)
}

fn parse_triple<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> IoResult<[f64; 3]> {
    let mut out = [0.0_f64; 3];
    for c in &mut out {
        let token = parts
            .next()
            .ok_or_else(|| IoError::at_line(line_no, "expected three numbers"))?;
        *c = token
            .parse()
            .map_err(|e| IoError::at_line(line_no, format!("bad number {token:?}: {e}")))?;
        if !c.is_finite() {
            return Err(IoError::at_line(line_no, "non-finite coordinate"));
        }
    }
    Ok(out)
}

/// Resolve one `v[/vt[/vn]]` corner to a zero-based vertex and normal index.
fn parse_corner(
    corner: &str,
    vertex_count: usize,
    normal_count: usize,
    line_no: usize,
) -> IoResult<(u32, Option<usize>)> {
    let mut fields = corner.split('/');
    let v = fields.next().unwrap_or_default();
    let vertex = resolve(v, vertex_count, line_no)?;
    let vertex = u32::try_from(vertex)
        .map_err(|_| IoError::at_line(line_no, format!("vertex index {v} too large")))?;

    let normal = match fields.nth(1) {
        Some(vn) if !vn.is_empty() => {
            let n = resolve(vn, normal_count, line_no)?;
            if n >= normal_count {
                return Err(IoError::at_line(line_no, format!("normal {vn} does not exist")));
            }
            Some(n)
        }
        _ => None,
    };
    Ok((vertex, normal))
}

/// Turn a 1-based or negative relative OBJ index into a zero-based one.
fn resolve(token: &str, count: usize, line_no: usize) -> IoResult<usize> {
    let index: i64 = token
        .parse()
        .map_err(|e| IoError::at_line(line_no, format!("bad index {token:?}: {e}")))?;
    let resolved = match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => usize::try_from(i.unsigned_abs())
            .ok()
            .and_then(|back| count.checked_sub(back)),
    };
    resolved.ok_or_else(|| IoError::at_line(line_no, format!("index {index} out of range")))
}

/// Save a mesh to an OBJ file.
///
/// # Errors
///
/// Returns an error if the mesh is invalid or the file cannot be written.
pub fn save_obj<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    mesh.validate()
        .map_err(|e| IoError::invalid_content(format!("cannot save mesh: {e}")))?;
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ to any writer.
///
/// Normals are written only when every vertex has one.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_obj<W: Write>(mesh: &IndexedMesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "# mesh-io")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    )?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
    }

    let with_normals = !mesh.vertices.is_empty() && mesh.vertices.iter().all(|v| v.normal.is_some());
    if with_normals {
        for n in mesh.vertices.iter().filter_map(|v| v.normal) {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
    }

    for face in &mesh.faces {
        write!(writer, "f")?;
        for &v in face {
            let i = u64::from(v) + 1;
            if with_normals {
                write!(writer, " {i}//{i}")?;
            } else {
                write!(writer, " {i}")?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
