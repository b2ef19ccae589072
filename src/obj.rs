use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::math::Point;
use crate::mesh::{Face, Mesh, VertexRef};
use crate::texture::{TextureImage, Uv};

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
    IndexOutOfRange { face: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "mesh io error: {}", e),
            LoadError::Parse { line, message } => {
                write!(f, "mesh parse error at line {}: {}", line, message)
            }
            LoadError::IndexOutOfRange { face } => {
                write!(f, "mesh face {} references an out-of-range index", face)
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// Load a Wavefront-style mesh. Vertex components are stored in the natural
/// `(x, y, z)` order of the file. Faces must carry full `point/uv/normal`
/// index triples; polygons with more than three corners are fan-triangulated.
pub fn load_obj(path: impl AsRef<Path>, texture: TextureImage) -> Result<Mesh, LoadError> {
    let file = File::open(&path)?;
    let mesh = parse_obj(BufReader::new(file), texture)?;
    log::info!(
        "loaded {}: {} points, {} normals, {} uvs, {} faces",
        path.as_ref().display(),
        mesh.points.len(),
        mesh.normals.len(),
        mesh.uvs.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}

pub fn parse_obj<R: BufRead>(reader: R, texture: TextureImage) -> Result<Mesh, LoadError> {
    let mut points = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => points.push(parse_point(fields, lineno)?),
            Some("vn") => normals.push(parse_point(fields, lineno)?),
            Some("vt") => uvs.push(parse_uv(fields, lineno)?),
            Some("f") => {
                let corners = fields
                    .map(|field| parse_vertex_ref(field, lineno))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(parse_error(lineno, "face with fewer than 3 vertices"));
                }
                // Fan triangulation, anchored at the first corner.
                for k in 1..corners.len() - 1 {
                    faces.push(Face {
                        vertices: [corners[0], corners[k], corners[k + 1]],
                    });
                }
            }
            // Comments, object/group/material statements and blank lines.
            _ => continue,
        }
    }

    for (i, face) in faces.iter().enumerate() {
        for v in &face.vertices {
            if v.point >= points.len() || v.normal >= normals.len() || v.uv >= uvs.len() {
                return Err(LoadError::IndexOutOfRange { face: i });
            }
        }
    }

    Ok(Mesh::new(points, normals, uvs, faces, texture))
}

fn parse_error(line: usize, message: &str) -> LoadError {
    LoadError::Parse {
        line,
        message: message.to_string(),
    }
}

fn parse_float<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    lineno: usize,
) -> Result<f32, LoadError> {
    fields
        .next()
        .ok_or_else(|| parse_error(lineno, "missing component"))?
        .parse()
        .map_err(|_| parse_error(lineno, "malformed number"))
}

fn parse_point<'a>(
    mut fields: impl Iterator<Item = &'a str>,
    lineno: usize,
) -> Result<Point, LoadError> {
    let x = parse_float(&mut fields, lineno)?;
    let y = parse_float(&mut fields, lineno)?;
    let z = parse_float(&mut fields, lineno)?;
    Ok(Point::new(x, y, z))
}

fn parse_uv<'a>(
    mut fields: impl Iterator<Item = &'a str>,
    lineno: usize,
) -> Result<Uv, LoadError> {
    let u = parse_float(&mut fields, lineno)?;
    let v = parse_float(&mut fields, lineno)?;
    Ok(Uv::new(u, v))
}

// One face corner: "point/uv/normal" with 1-based indices.
fn parse_vertex_ref(field: &str, lineno: usize) -> Result<VertexRef, LoadError> {
    let mut indices = field.split('/').map(|part| {
        part.parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or_else(|| parse_error(lineno, "malformed face index"))
    });
    let mut next = |what: &str| {
        indices
            .next()
            .unwrap_or_else(|| Err(parse_error(lineno, what)))
    };
    let point = next("missing point index")?;
    let uv = next("missing texture index")?;
    let normal = next("missing normal index")?;
    Ok(VertexRef { point, normal, uv })
}
