//! OBJ file loader for 3D models

use crate::render::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors from OBJ parsing
#[derive(Error, Debug)]
pub enum ObjError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A numeric field failed to parse
    #[error("Parse error: {0}")]
    ParseError(String),
    /// A face referenced data that does not exist
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ mesh loader
///
/// Supports `v`, `vn`, `vt`, and `f` records with triangulated or polygonal
/// faces (polygons are fanned into triangles). Faces may index positions
/// alone (`f 1 2 3`) or the full `pos/tex/normal` triple. When a file
/// carries no normals, they are computed from face geometry.
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file from a path
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path.as_ref())?;
        let mesh = Self::parse(BufReader::new(file))?;
        log::debug!(
            "loaded mesh with {} vertices, {} triangles from {}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            path.as_ref().display()
        );
        Ok(mesh)
    }

    /// Parse OBJ data from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut saw_normals = false;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_vec3(&parts, "vertex")?),
                "vn" => {
                    saw_normals = true;
                    normals.push(parse_vec3(&parts, "normal")?);
                }
                "vt" => tex_coords.push(parse_vec2(&parts, "tex coord")?),
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::InvalidFormat(format!(
                            "face with fewer than 3 vertices: '{line}'"
                        )));
                    }

                    let mut face: Vec<u32> = Vec::with_capacity(parts.len() - 1);
                    for corner in &parts[1..] {
                        let vertex =
                            resolve_corner(corner, &positions, &tex_coords, &normals)?;
                        face.push(vertices.len() as u32);
                        vertices.push(vertex);
                    }

                    // Fan triangulation for polygons
                    for i in 1..face.len() - 1 {
                        indices.push(face[0]);
                        indices.push(face[i]);
                        indices.push(face[i + 1]);
                    }
                }
                _ => {} // groups, materials, smoothing: ignored
            }
        }

        let mut mesh = Mesh::new(vertices, indices);
        if !saw_normals {
            mesh.compute_normals();
        }
        Ok(mesh)
    }
}

fn parse_vec3(parts: &[&str], what: &str) -> Result<[f32; 3], ObjError> {
    if parts.len() < 4 {
        return Err(ObjError::ParseError(format!("incomplete {what} record")));
    }
    Ok([
        parse_f32(parts[1], what)?,
        parse_f32(parts[2], what)?,
        parse_f32(parts[3], what)?,
    ])
}

fn parse_vec2(parts: &[&str], what: &str) -> Result<[f32; 2], ObjError> {
    if parts.len() < 3 {
        return Err(ObjError::ParseError(format!("incomplete {what} record")));
    }
    Ok([parse_f32(parts[1], what)?, parse_f32(parts[2], what)?])
}

fn parse_f32(s: &str, what: &str) -> Result<f32, ObjError> {
    s.parse()
        .map_err(|_| ObjError::ParseError(format!("invalid {what} value '{s}'")))
}

/// Resolve one `pos[/tex[/normal]]` face corner into a vertex
fn resolve_corner(
    corner: &str,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
) -> Result<Vertex, ObjError> {
    let fields: Vec<&str> = corner.split('/').collect();

    let pos_idx: usize = fields[0]
        .parse()
        .map_err(|_| ObjError::ParseError(format!("invalid position index '{}'", fields[0])))?;
    let position = *positions
        .get(pos_idx.wrapping_sub(1))
        .ok_or_else(|| ObjError::InvalidFormat(format!("position index {pos_idx} out of bounds")))?;

    let tex_coord = fields
        .get(1)
        .filter(|f| !f.is_empty())
        .and_then(|f| f.parse::<usize>().ok())
        .and_then(|i| tex_coords.get(i.wrapping_sub(1)))
        .copied()
        .unwrap_or([0.0, 0.0]);

    let normal = fields
        .get(2)
        .filter(|f| !f.is_empty())
        .and_then(|f| f.parse::<usize>().ok())
        .and_then(|i| normals.get(i.wrapping_sub(1)))
        .copied()
        .unwrap_or([0.0, 0.0, 0.0]);

    Ok(Vertex::new(position, normal, tex_coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRIANGLE: &str = "\
# simple triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    #[test]
    fn test_parse_positions_only() {
        let mesh = ObjLoader::parse(Cursor::new(TRIANGLE)).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        // normals computed since the file had none
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_full_face_triples() {
        let data = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";
        let mesh = ObjLoader::parse(Cursor::new(data)).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices[1].tex_coord, [1.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_quad_fan_triangulation() {
        let data = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = ObjLoader::parse(Cursor::new(data)).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_out_of_bounds_index_is_error() {
        let data = "v 0 0 0\nf 1 2 3\n";
        assert!(matches!(
            ObjLoader::parse(Cursor::new(data)),
            Err(ObjError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_bad_number_is_error() {
        let data = "v 0 zero 0\n";
        assert!(matches!(
            ObjLoader::parse(Cursor::new(data)),
            Err(ObjError::ParseError(_))
        ));
    }
}
