//! Minimal Wavefront OBJ reader for collision meshes
//!
//! Only `v` and `f` records matter for collision; everything else
//! (normals, texture coordinates, groups, materials) is skipped.

use crate::core_types::error::{Result, SmokeError};
use crate::core_types::vec3::Vec3;

/// Vertices and triangles read from an OBJ document
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ObjMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

/// Resolve one face token (`7`, `7/1`, `7//3`, `-1`) to a zero-based index.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> Result<u32> {
    let raw = token.split('/').next().unwrap_or_default();
    let index: i64 = raw
        .parse()
        .map_err(|_| SmokeError::scene_load(format!("line {line_no}: bad face index '{token}'")))?;

    let count = vertex_count as i64;
    let resolved = match index {
        0 => {
            return Err(SmokeError::scene_load(format!(
                "line {line_no}: face index 0 is not valid"
            )))
        }
        i if i > 0 => i - 1,
        i => count + i,
    };

    if !(0..count).contains(&resolved) {
        return Err(SmokeError::scene_load(format!(
            "line {line_no}: face index {index} out of range for {count} vertices"
        )));
    }
    u32::try_from(resolved)
        .map_err(|_| SmokeError::scene_load(format!("line {line_no}: face index {index} too large")))
}

/// Parse OBJ text into a triangle mesh.
///
/// Polygons are fan-triangulated around their first vertex. Negative
/// indices count back from the most recent vertex.
pub(crate) fn parse_obj(source: &str) -> Result<ObjMesh> {
    let mut mesh = ObjMesh::default();

    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(str::parse::<f32>)
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| SmokeError::scene_load(format!("line {line_no}: bad vertex: {e}")))?;
                let [x, y, z] = coords[..] else {
                    return Err(SmokeError::scene_load(format!(
                        "line {line_no}: vertex needs three coordinates"
                    )));
                };
                mesh.vertices.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let corners = tokens
                    .map(|t| resolve_index(t, mesh.vertices.len(), line_no))
                    .collect::<Result<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(SmokeError::scene_load(format!(
                        "line {line_no}: face needs at least three vertices"
                    )));
                }
                for pair in corners[1..].windows(2) {
                    mesh.indices.push([corners[0], pair[0], pair[1]]);
                }
            }
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(SmokeError::scene_load("mesh contains no faces"));
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_is_fan_triangulated() {
        let source = "\
# floor quad
v 0 0 0
v 100 0 0
v 100 100 0
v 0 100 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";
        let mesh = parse_obj(source).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_negative_indices() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(source).unwrap();
        assert_eq!(mesh.indices, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_malformed_input() {
        assert!(parse_obj("v 0 0\nf 1 1 1\n").is_err());
        assert!(parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").is_err());
        assert!(parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").is_err());
        assert!(parse_obj("v 0 0 0\n").is_err());
    }
}
