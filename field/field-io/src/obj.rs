//! Wavefront OBJ subset loader.
//!
//! Recognised prefixes:
//!
//! - `v x y z`: vertex position; extra fields are ignored. A vertex line
//!   that does not parse is logged and skipped.
//! - `f a b c …`: face; only the integer before the first `/` of each
//!   token is consumed (so `f 1/2/3 4//5 6` works). Indices are 1-based.
//!   Faces with more than three vertices are fan-triangulated as
//!   `(0, i, i+1)`. An out-of-range index fails the whole load.
//!
//! Any other prefix (including comments, `vt`, `vn`, `usemtl`, groups) is
//! ignored.
//!
//! Loading is two-pass: vertex and face lines are collected first, and face
//! indices resolve only once the whole file has been read, so a face may
//! reference a vertex defined later in the file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use field_types::TriangleMesh;
use nalgebra::Point3;
use tracing::{debug, warn};

use crate::error::{IoError, IoResult};

/// Load a triangle mesh from an OBJ file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or if a face
/// references a vertex that does not exist. Malformed vertex lines are
/// skipped with a warning rather than failing the load.
///
/// # Example
///
/// ```no_run
/// use field_io::load_obj;
///
/// let mesh = load_obj("data/bunny.obj").unwrap();
/// assert!(!mesh.is_empty());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let mesh = parse_obj(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.face_count(),
        "loaded OBJ mesh"
    );
    Ok(mesh)
}

/// Parse OBJ content from any buffered reader.
///
/// This is the workhorse behind [`load_obj`]; it is public so callers can
/// parse in-memory data (tests use [`std::io::Cursor`]).
///
/// # Errors
///
/// Same contract as [`load_obj`], minus the file-open failures.
pub fn parse_obj<R: BufRead>(reader: R) -> IoResult<TriangleMesh> {
    let mut vertices = Vec::new();
    let mut raw_faces: Vec<(usize, Vec<i64>)> = Vec::new();

    // First pass: collect vertices and raw face index lists.
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => match parse_vertex(tokens) {
                Some(vertex) => vertices.push(vertex),
                None => warn!(line = line_no, "skipping malformed OBJ vertex line"),
            },
            Some("f") => {
                let corners = parse_face_indices(tokens, line_no)?;
                if corners.len() < 3 {
                    warn!(line = line_no, "skipping face with fewer than 3 vertices");
                    continue;
                }
                raw_faces.push((line_no, corners));
            }
            _ => {}
        }
    }

    // Second pass: indices resolve against the complete vertex set, so a
    // face may reference a vertex defined later in the file.
    let mut mesh = TriangleMesh::from_parts(vertices, Vec::with_capacity(raw_faces.len()));
    for (line_no, raw) in raw_faces {
        let corners = resolve_face(&raw, line_no, mesh.vertex_count())?;
        // Fan triangulation: (0, i, i+1).
        for i in 1..corners.len() - 1 {
            mesh.faces.push([corners[0], corners[i], corners[i + 1]]);
        }
    }

    Ok(mesh)
}

fn parse_vertex<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Point3<f64>> {
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    let z = tokens.next()?.parse().ok()?;
    Some(Point3::new(x, y, z))
}

fn parse_face_indices<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> IoResult<Vec<i64>> {
    tokens
        .map(|token| {
            let index_str = token.split('/').next().unwrap_or(token);
            index_str.parse().map_err(|_| IoError::MalformedFace {
                line,
                message: format!("vertex index `{token}` is not an integer"),
            })
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn resolve_face(raw: &[i64], line: usize, vertex_count: usize) -> IoResult<Vec<u32>> {
    raw.iter()
        .map(|&index| {
            // OBJ indices are 1-based.
            if index < 1 || index as usize > vertex_count {
                return Err(IoError::FaceIndexOutOfRange {
                    index,
                    line,
                    vertex_count,
                });
            }
            Ok((index - 1) as u32)
        })
        .collect()
}
