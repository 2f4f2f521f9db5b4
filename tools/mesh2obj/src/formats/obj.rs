//! Wavefront OBJ export
//!
//! - v x y z [r g b]   (vertex position, optional vertex color)
//! - vt u v            (texture coordinate)
//! - vn nx ny nz       (vertex normal)
//! - f a/a/a ...       (face; every attribute shares the position index)

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::mesh::Mesh;

/// Header comment written at the top of every export
pub const OBJ_HEADER: &str = "# mesh2obj";

/// Default number of fractional digits for exported floats
pub const DEFAULT_PRECISION: usize = 8;

/// Which vertex attributes an OBJ export carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjOptions {
    /// Write `vn` lines (derived from faces if the mesh has none)
    pub include_normals: bool,
    /// Write `vt` lines when the mesh has texture coordinates
    pub include_texture: bool,
    /// Append RGB to `v` lines when the mesh has vertex colors
    pub include_color: bool,
    /// Fractional digits for every float
    pub precision: usize,
}

impl Default for ObjOptions {
    /// Exporter default: every attribute the mesh has
    fn default() -> Self {
        Self {
            include_normals: true,
            include_texture: true,
            include_color: true,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ObjOptions {
    /// Normals forced on, texture and color left at the exporter default
    pub fn with_normals() -> Self {
        Self {
            include_normals: true,
            ..Self::default()
        }
    }

    /// Positions and faces only
    pub fn geometry_only() -> Self {
        Self {
            include_normals: false,
            include_texture: false,
            include_color: false,
            ..Self::default()
        }
    }
}

/// Serialize a mesh as OBJ text into a writer
pub fn write_obj<W: Write>(w: &mut W, mesh: &Mesh, options: &ObjOptions) -> Result<()> {
    let p = options.precision;

    let colors = mesh.colors.as_deref().filter(|_| options.include_color);
    let uvs = mesh.uvs.as_deref().filter(|_| options.include_texture);
    let normals = options.include_normals.then(|| mesh.vertex_normals());

    writeln!(w, "{}", OBJ_HEADER)?;

    for (i, [x, y, z]) in mesh.positions.iter().enumerate() {
        write!(w, "v {x:.p$} {y:.p$} {z:.p$}")?;
        if let Some([r, g, b, _]) = colors.and_then(|c| c.get(i)) {
            write!(w, " {r:.p$} {g:.p$} {b:.p$}")?;
        }
        writeln!(w)?;
    }

    if let Some(uvs) = uvs {
        for [u, v] in uvs {
            writeln!(w, "vt {u:.p$} {v:.p$}")?;
        }
    }

    if let Some(normals) = &normals {
        for [x, y, z] in normals {
            writeln!(w, "vn {x:.p$} {y:.p$} {z:.p$}")?;
        }
    }

    for face in &mesh.faces {
        write!(w, "f")?;
        for &index in face {
            let i = index + 1; // OBJ indices start at 1
            match (uvs.is_some(), normals.is_some()) {
                (true, true) => write!(w, " {i}/{i}/{i}")?,
                (false, true) => write!(w, " {i}//{i}")?,
                (true, false) => write!(w, " {i}/{i}")?,
                (false, false) => write!(w, " {i}")?,
            }
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Serialize a mesh as OBJ text
pub fn export_obj(mesh: &Mesh, options: &ObjOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_obj(&mut buf, mesh, options)?;
    Ok(String::from_utf8(buf)?)
}

/// Write a mesh to an OBJ file, replacing any existing file
pub fn export(mesh: &Mesh, path: &Path, options: &ObjOptions) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    write_obj(&mut writer, mesh, options)
        .with_context(|| format!("Failed to write OBJ: {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write OBJ: {:?}", path))?;

    Ok(())
}
