//! glTF/GLB loading with scene flattening

use super::types::Mesh;
use anyhow::{bail, Context, Result};
use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;
use std::path::Path;

/// Load a glTF/GLB file as one merged mesh.
///
/// Walks the default scene (or the first scene) and bakes every node's world
/// transform into its geometry. Documents without scenes contribute every
/// mesh untransformed. Texture images are never decoded.
pub fn load_gltf(input: &Path) -> Result<Mesh> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::open(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;
    let buffers = gltf::import_buffers(&document, input.parent(), blob)
        .with_context(|| format!("Failed to load glTF buffers: {:?}", input))?;

    let mut merged = Mesh::default();

    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                append_node(&node, Mat4::IDENTITY, &buffers, &mut merged)?;
            }
        }
        None => {
            for mesh in document.meshes() {
                append_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut merged)?;
            }
        }
    }

    if merged.is_empty() {
        bail!("No triangle geometry found in {:?}", input);
    }

    Ok(merged)
}

fn append_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    merged: &mut Mesh,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, buffers, merged)?;
    }

    for child in node.children() {
        append_node(&child, world, buffers, merged)?;
    }

    Ok(())
}

fn append_mesh(
    mesh: &gltf::Mesh,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    merged: &mut Mesh,
) -> Result<()> {
    for primitive in mesh.primitives() {
        let part = read_primitive(&primitive, buffers)
            .with_context(|| format!("Failed to read mesh {:?}", mesh.name().unwrap_or("")))?;
        if let Some(part) = part {
            merged.append(transform_mesh(part, world));
        }
    }
    Ok(())
}

/// Read one primitive in its local space. Non-triangle primitives yield `None`.
fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<Mesh>> {
    let mode = primitive.mode();
    if !matches!(mode, Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan) {
        tracing::warn!("Skipping primitive with non-triangle mode {:?}", mode);
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| {
        buffers
            .get(buffer.index())
            .map(|data| data.0.as_slice())
    });

    // Positions (required)
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .context("No positions in primitive")?
        .collect();
    let vertex_count = positions.len();

    // Missing indices mean the vertices are drawn in order
    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..vertex_count as u32).collect(),
    };

    if let Some((idx, &value)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &v)| v as usize >= vertex_count)
    {
        bail!(
            "Index {} at position {} is out of range for {} vertices",
            value,
            idx,
            vertex_count
        );
    }

    let faces = triangulate(mode, &indices);

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

    // glTF puts the UV origin top-left, OBJ bottom-left
    let uvs: Option<Vec<[f32; 2]>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().map(|[u, v]| [u, 1.0 - v]).collect());

    let colors: Option<Vec<[f32; 4]>> = reader
        .read_colors(0)
        .map(|iter| iter.into_rgba_f32().collect());

    let mut mesh = Mesh {
        normals: matching_len(normals, vertex_count, "normal"),
        uvs: matching_len(uvs, vertex_count, "texture coordinate"),
        colors: matching_len(colors, vertex_count, "color"),
        positions,
        faces,
    };
    mesh.remove_unreferenced_vertices();

    Ok(Some(mesh))
}

fn matching_len<T>(attr: Option<Vec<T>>, vertex_count: usize, what: &str) -> Option<Vec<T>> {
    match attr {
        Some(values) if values.len() == vertex_count => Some(values),
        Some(values) => {
            tracing::warn!(
                "Mesh has mismatched {} count ({} vs {} vertices), ignoring {}s",
                what,
                values.len(),
                vertex_count,
                what
            );
            None
        }
        None => None,
    }
}

/// Turn an index list into triangles according to the primitive mode.
///
/// Strips alternate winding so every triangle keeps the orientation of the
/// first one. Degenerate strip/fan triangles are dropped.
pub(crate) fn triangulate(mode: Mode, indices: &[u32]) -> Vec<[u32; 3]> {
    let degenerate = |[a, b, c]: &[u32; 3]| a == b || b == c || a == c;

    match mode {
        Mode::Triangles => indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| {
                if i % 2 == 0 {
                    [w[0], w[1], w[2]]
                } else {
                    [w[1], w[0], w[2]]
                }
            })
            .filter(|tri| !degenerate(tri))
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&hub, rest)) => rest
                .windows(2)
                .map(|w| [hub, w[0], w[1]])
                .filter(|tri| !degenerate(tri))
                .collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Bake a world transform into a mesh's positions and normals
pub(crate) fn transform_mesh(mut mesh: Mesh, world: Mat4) -> Mesh {
    if world == Mat4::IDENTITY {
        return mesh;
    }

    for p in &mut mesh.positions {
        *p = world.transform_point3(Vec3::from(*p)).to_array();
    }

    let linear = Mat3::from_mat4(world);
    let det = linear.determinant();

    if det.abs() <= f32::EPSILON {
        // Collapsed transform: normals are meaningless, derive them later
        mesh.normals = None;
    } else if let Some(normals) = &mut mesh.normals {
        let normal_matrix = linear.inverse().transpose();
        for n in normals.iter_mut() {
            *n = (normal_matrix * Vec3::from(*n)).normalize_or_zero().to_array();
        }
    }

    // Mirroring flips the winding
    if det < 0.0 {
        for face in &mut mesh.faces {
            face.swap(1, 2);
        }
    }

    mesh
}
