//! Wavefront OBJ loader.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;

use super::{MeshData, Model, ModelError, ModelSource};

/// Loads `.obj` files. Each `o`/`g` statement starts a new mesh; faces are
/// fan-triangulated and every distinct position/normal pair becomes one
/// vertex. Meshes without normals get smooth normals generated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl ObjLoader {
    pub fn parse(reader: impl BufRead) -> Result<Model, ModelError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coord_count = 0usize;
        let mut meshes = Vec::new();
        let mut current = MeshBuilder::new("default");

        for (line_index, line) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };

            match keyword {
                "v" => positions.push(parse_vec3(parts, line_number, "vertex")?),
                "vn" => normals.push(parse_vec3(parts, line_number, "normal")?),
                "vt" => tex_coord_count += 1,
                "o" | "g" => {
                    let name = parts.collect::<Vec<_>>().join(" ");
                    let next = MeshBuilder::new(if name.is_empty() { "unnamed" } else { name.as_str() });
                    let finished = std::mem::replace(&mut current, next);
                    if let Some(mesh) = finished.finish(&positions, &normals) {
                        meshes.push(mesh);
                    }
                }
                "f" => {
                    let mut corners = Vec::with_capacity(4);
                    for token in parts {
                        corners.push(parse_corner(
                            token,
                            line_number,
                            positions.len(),
                            tex_coord_count,
                            normals.len(),
                        )?);
                    }
                    if corners.len() < 3 {
                        return Err(ModelError::Parse {
                            line: line_number,
                            message: format!("face needs at least 3 vertices, got {}", corners.len()),
                        });
                    }
                    current.push_polygon(&corners)?;
                }
                _ => {
                    tracing::trace!(target: "geometry", keyword, line = line_number, "ignoring OBJ statement");
                }
            }
        }

        if let Some(mesh) = current.finish(&positions, &normals) {
            meshes.push(mesh);
        }

        if meshes.is_empty() {
            return Err(ModelError::InvalidFormat("no faces found".to_string()));
        }

        Ok(Model { meshes })
    }
}

impl ModelSource for ObjLoader {
    fn load(&self, path: &Path) -> Result<Model, ModelError> {
        let file = File::open(path)?;
        let model = Self::parse(BufReader::new(file))?;
        tracing::debug!(
            target: "geometry",
            path = %path.display(),
            meshes = model.meshes.len(),
            "loaded OBJ model"
        );
        Ok(model)
    }
}

type Corner = (usize, Option<usize>);

struct MeshBuilder {
    name: String,
    lookup: HashMap<Corner, u32>,
    corners: Vec<Corner>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lookup: HashMap::new(),
            corners: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn vertex(&mut self, corner: Corner) -> Result<u32, ModelError> {
        if let Some(&index) = self.lookup.get(&corner) {
            return Ok(index);
        }
        let index = vertex_index(self.corners.len())?;
        self.corners.push(corner);
        self.lookup.insert(corner, index);
        Ok(index)
    }

    fn push_polygon(&mut self, corners: &[Corner]) -> Result<(), ModelError> {
        let first = self.vertex(corners[0])?;
        for pair in corners[1..].windows(2) {
            let b = self.vertex(pair[0])?;
            let c = self.vertex(pair[1])?;
            self.indices.extend_from_slice(&[first, b, c]);
        }
        Ok(())
    }

    fn finish(self, positions: &[[f32; 3]], normals: &[[f32; 3]]) -> Option<MeshData> {
        if self.indices.is_empty() {
            return None;
        }

        let mesh_positions: Vec<[f32; 3]> = self
            .corners
            .iter()
            .map(|&(position, _)| positions[position])
            .collect();

        let needs_generated = self.corners.iter().any(|(_, normal)| normal.is_none());
        let generated = if needs_generated {
            smooth_normals(&self.corners, &self.indices, positions)
        } else {
            HashMap::new()
        };

        let mesh_normals = self
            .corners
            .iter()
            .map(|&(position, normal)| match normal {
                Some(normal) => normals[normal],
                None => generated.get(&position).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        Some(MeshData {
            name: self.name,
            positions: mesh_positions,
            normals: mesh_normals,
            indices: self.indices,
        })
    }
}

/// Area-weighted average of the face normals touching each position.
/// Index streams are 32-bit.
fn vertex_index(count: usize) -> Result<u32, ModelError> {
    u32::try_from(count).map_err(|_| {
        ModelError::InvalidFormat(format!("mesh has more than {} distinct vertices", u32::MAX))
    })
}

fn smooth_normals(
    corners: &[Corner],
    indices: &[u32],
    positions: &[[f32; 3]],
) -> HashMap<usize, [f32; 3]> {
    let mut sums: HashMap<usize, Vec3> = HashMap::new();
    for triangle in indices.chunks_exact(3) {
        let ids = [
            corners[triangle[0] as usize].0,
            corners[triangle[1] as usize].0,
            corners[triangle[2] as usize].0,
        ];
        let [a, b, c] = ids.map(|id| Vec3::from_array(positions[id]));
        let face = (b - a).cross(c - a);
        for id in ids {
            *sums.entry(id).or_insert(Vec3::ZERO) += face;
        }
    }
    sums.into_iter()
        .map(|(id, sum)| (id, sum.normalize_or(Vec3::Y).to_array()))
        .collect()
}

fn parse_vec3<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<[f32; 3], ModelError> {
    let mut value = [0.0f32; 3];
    for (axis, slot) in ["x", "y", "z"].iter().zip(value.iter_mut()) {
        let token = parts.next().ok_or_else(|| ModelError::Parse {
            line,
            message: format!("{what} is missing its {axis} component"),
        })?;
        *slot = token.parse().map_err(|_| ModelError::Parse {
            line,
            message: format!("invalid {what} {axis}: `{token}`"),
        })?;
    }
    Ok(value)
}

fn parse_corner(
    token: &str,
    line: usize,
    position_count: usize,
    tex_coord_count: usize,
    normal_count: usize,
) -> Result<Corner, ModelError> {
    let mut fields = token.split('/');
    let position = fields
        .next()
        .filter(|field| !field.is_empty())
        .ok_or_else(|| ModelError::Parse {
            line,
            message: format!("face corner `{token}` has no position index"),
        })?;
    let position = resolve_index(position, position_count, line, "position")?;

    if let Some(tex_coord) = fields.next().filter(|field| !field.is_empty()) {
        resolve_index(tex_coord, tex_coord_count, line, "texture coordinate")?;
    }

    let normal = match fields.next().filter(|field| !field.is_empty()) {
        Some(normal) => Some(resolve_index(normal, normal_count, line, "normal")?),
        None => None,
    };

    Ok((position, normal))
}

/// OBJ indices are 1-based; negative values count back from the end.
fn resolve_index(field: &str, count: usize, line: usize, what: &str) -> Result<usize, ModelError> {
    let raw: i64 = field.parse().map_err(|_| ModelError::Parse {
        line,
        message: format!("invalid {what} index `{field}`"),
    })?;
    let resolved = match raw {
        0 => None,
        raw if raw > 0 => Some(raw as usize - 1),
        raw => (count as i64 + raw).try_into().ok(),
    };
    resolved.filter(|&index| index < count).ok_or_else(|| ModelError::Parse {
        line,
        message: format!("{what} index {raw} out of range (have {count})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Model, ModelError> {
        ObjLoader::parse(text.as_bytes())
    }

    const QUAD_WITH_NORMALS: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let model = parse(QUAD_WITH_NORMALS).unwrap();
        assert_eq!(model.meshes.len(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn shared_corners_are_deduplicated_per_normal() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vn 0 0 -1
f 1//1 2//1 3//1
f 1//2 3//2 2//2
";
        let mesh = &parse(text).unwrap().meshes[0];
        assert_eq!(mesh.vertex_count(), 6, "same position with another normal is a new vertex");
        assert_eq!(mesh.positions.len(), mesh.normals.len());
    }

    #[test]
    fn groups_split_meshes_and_empty_groups_are_dropped() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
o first
f 1 2 3
g empty
o second
f -3 -2 -1
";
        let model = parse(text).unwrap();
        let names: Vec<_> = model.meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(model.meshes[1].indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_normals_are_generated() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let mesh = &parse(text).unwrap().meshes[0];
        for normal in &mesh.normals {
            assert_eq!(*normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn texture_coordinates_are_accepted_and_ignored() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
";
        let mesh = &parse(text).unwrap().meshes[0];
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn out_of_range_index_is_reported_with_line() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        match parse(text) {
            Err(ModelError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn file_without_faces_is_invalid() {
        assert!(matches!(
            parse("v 0 0 0\n"),
            Err(ModelError::InvalidFormat(_))
        ));
    }

    #[test]
    fn garbage_coordinate_is_a_parse_error() {
        assert!(matches!(
            parse("v 0 zero 0\n"),
            Err(ModelError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn vertex_index_rejects_counts_past_u32() {
        assert_eq!(vertex_index(7).unwrap(), 7);
        assert_eq!(vertex_index(u32::MAX as usize).unwrap(), u32::MAX);

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            vertex_index(u32::MAX as usize + 1),
            Err(ModelError::InvalidFormat(_))
        ));
    }
}
