//! OBJ file loader for the board, piece and marker models
//!
//! Reads positions, normals, texture coordinates and faces. Polygons are
//! fan-triangulated; material and grouping statements are ignored since
//! every model is drawn with a shared shading stage.

use crate::render::primitives::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A statement had an unparseable number
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What failed to parse
        message: String,
    },
    /// Structurally invalid content
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Normal used when a face corner has none
const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// OBJ parser
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path.as_ref())?;
        let mesh = Self::parse(BufReader::new(file))?;
        log::debug!(
            "Loaded {} ({} vertices, {} triangles)",
            path.as_ref().display(),
            mesh.vertices.len(),
            mesh.index_count() / 3
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let number = number + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };
            let args: Vec<&str> = parts.collect();

            match keyword {
                "v" => positions.push(parse_floats::<3>(&args, number, "vertex")?),
                "vn" => normals.push(parse_floats::<3>(&args, number, "normal")?),
                "vt" => tex_coords.push(parse_floats::<2>(&args, number, "texture coordinate")?),
                "f" => {
                    if args.len() < 3 {
                        return Err(ObjError::ParseError {
                            line: number,
                            message: format!("face needs at least 3 corners, got {}", args.len()),
                        });
                    }

                    let first = vertices.len();
                    for corner in &args {
                        let mut refs = corner.split('/');
                        let position = refs
                            .next()
                            .and_then(|r| resolve(r, positions.len()))
                            .and_then(|i| positions.get(i))
                            .ok_or_else(|| ObjError::InvalidFormat(format!(
                                "line {number}: position reference {corner:?} out of range"
                            )))?;
                        let tex_coord = refs
                            .next()
                            .and_then(|r| resolve(r, tex_coords.len()))
                            .and_then(|i| tex_coords.get(i))
                            .copied()
                            .unwrap_or([0.0, 0.0]);
                        let normal = refs
                            .next()
                            .and_then(|r| resolve(r, normals.len()))
                            .and_then(|i| normals.get(i))
                            .copied()
                            .unwrap_or(DEFAULT_NORMAL);
                        vertices.push(Vertex::new(*position, normal, tex_coord));
                    }

                    // Fan triangulation
                    let first = index(first)?;
                    let last = index(vertices.len())?;
                    for i in (first + 1)..(last - 1) {
                        indices.extend_from_slice(&[first, i, i + 1]);
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        Ok(Mesh::new(vertices, indices))
    }
}

fn parse_floats<const N: usize>(args: &[&str], line: usize, what: &str) -> Result<[f32; N], ObjError> {
    if args.len() < N {
        return Err(ObjError::ParseError {
            line,
            message: format!("{what} needs {N} components, got {}", args.len()),
        });
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| ObjError::ParseError {
            line,
            message: format!("invalid {what} component {arg:?}"),
        })?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ reference to a 0-based index
fn resolve(reference: &str, len: usize) -> Option<usize> {
    if reference.is_empty() {
        return None;
    }
    let value: i64 = reference.parse().ok()?;
    match value {
        v if v > 0 => usize::try_from(v - 1).ok(),
        v if v < 0 => len.checked_sub(usize::try_from(-v).ok()?),
        _ => None,
    }
}

fn index(i: usize) -> Result<u32, ObjError> {
    u32::try_from(i).map_err(|_| ObjError::InvalidFormat("mesh exceeds u32 indices".to_string()))
}
