//! OBJ mesh loading

use super::types::Mesh;
use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Face corner: position index plus optional texture/normal indices (zero-based)
type Corner = (usize, Option<usize>, Option<usize>);

/// Load an OBJ file as one merged mesh.
///
/// Each distinct `v/vt/vn` corner becomes one vertex. UVs and normals are
/// kept only when every corner references them; vertex colors only when
/// every `v` line carries them.
pub fn load_obj(input: &Path) -> Result<Mesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

pub(crate) fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut colors_raw: Vec<Option<[f32; 4]>> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();
    let mut corners: Vec<[Corner; 3]> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    bail!("Vertex on line {} needs 3 coordinates", line_no + 1);
                }
                positions.push(parse_floats(&parts[1..4], line_no)?);

                // Non-standard but common: "v x y z r g b"
                let color = if parts.len() >= 7 {
                    let [r, g, b] = parse_floats::<3>(&parts[4..7], line_no)?;
                    Some([r, g, b, 1.0])
                } else {
                    None
                };
                colors_raw.push(color);
            }
            "vt" => {
                // "vt u [v [w]]": v defaults to 0
                let [u, v] = match parts.len() {
                    0 | 1 => bail!("Texture coordinate on line {} has no values", line_no + 1),
                    2 => [parse_floats::<1>(&parts[1..2], line_no)?[0], 0.0],
                    _ => parse_floats::<2>(&parts[1..3], line_no)?,
                };
                tex_coords.push([u, v]);
            }
            "vn" => {
                if parts.len() < 4 {
                    bail!("Normal on line {} needs 3 coordinates", line_no + 1);
                }
                normals_raw.push(parse_floats(&parts[1..4], line_no)?);
            }
            "f" => {
                if parts.len() < 4 {
                    bail!("Face on line {} needs at least 3 corners", line_no + 1);
                }
                let face: Vec<Corner> = parts[1..]
                    .iter()
                    .map(|s| {
                        parse_obj_corner(s, positions.len(), tex_coords.len(), normals_raw.len())
                            .with_context(|| {
                                format!("Invalid face corner {:?} on line {}", s, line_no + 1)
                            })
                    })
                    .collect::<Result<_>>()?;

                // Fan triangulation for convex polygons
                for i in 1..face.len() - 1 {
                    corners.push([face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if corners.is_empty() {
        bail!("No faces found in OBJ file");
    }

    let all_uv = corners.iter().flatten().all(|c| c.1.is_some());
    let all_normal = corners.iter().flatten().all(|c| c.2.is_some());
    let all_color = colors_raw.iter().all(Option::is_some);

    // Corners are deduplicated on the attributes that survive
    let mut lookup: HashMap<Corner, u32> = HashMap::new();
    let mut mesh = Mesh::default();
    let mut uvs = Vec::new();
    let mut normals = Vec::new();
    let mut colors = Vec::new();

    for tri in &corners {
        let mut face = [0u32; 3];
        for (slot, &(vi, vti, vni)) in face.iter_mut().zip(tri) {
            let key = (
                vi,
                vti.filter(|_| all_uv),
                vni.filter(|_| all_normal),
            );
            *slot = *lookup.entry(key).or_insert_with(|| {
                let index = mesh.positions.len() as u32;
                mesh.positions.push(positions[vi]);
                if let Some(ti) = key.1 {
                    uvs.push(tex_coords[ti]);
                }
                if let Some(ni) = key.2 {
                    normals.push(normals_raw[ni]);
                }
                if all_color {
                    colors.push(colors_raw[vi].unwrap_or([1.0; 4]));
                }
                index
            });
        }
        mesh.faces.push(face);
    }

    mesh.uvs = all_uv.then_some(uvs);
    mesh.normals = all_normal.then_some(normals);
    mesh.colors = all_color.then_some(colors);

    Ok(mesh)
}

fn parse_floats<const N: usize>(fields: &[&str], line_no: usize) -> Result<[f32; N]> {
    let mut values = [0.0f32; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field
            .parse()
            .with_context(|| format!("Invalid number {:?} on line {}", field, line_no + 1))?;
    }
    Ok(values)
}

/// Parse an OBJ face corner: "v", "v/vt", "v/vt/vn", or "v//vn".
///
/// Indices are 1-based; negative indices count back from the most recent
/// element of their kind.
fn parse_obj_corner(
    s: &str,
    position_count: usize,
    tex_coord_count: usize,
    normal_count: usize,
) -> Result<Corner> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = resolve_index(parts.first().copied().unwrap_or(""), position_count)?
        .context("Face corner has no position index")?;
    let vti = match parts.get(1) {
        Some(p) => resolve_index(p, tex_coord_count)?,
        None => None,
    };
    let vni = match parts.get(2) {
        Some(p) => resolve_index(p, normal_count)?,
        None => None,
    };

    Ok((vi, vti, vni))
}

fn resolve_index(s: &str, count: usize) -> Result<Option<usize>> {
    if s.is_empty() {
        return Ok(None);
    }

    let raw: i64 = s
        .parse()
        .with_context(|| format!("Invalid index {:?}", s))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => count.checked_sub(r.unsigned_abs() as usize),
    };

    match resolved {
        Some(i) if i < count => Ok(Some(i)),
        _ => bail!("Index {} is out of range for {} elements", raw, count),
    }
}
