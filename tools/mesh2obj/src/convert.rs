//! Mesh -> model.obj + model_geom.obj conversion

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::formats::{export, export_obj, ObjOptions};
use crate::mesh;

/// File name of the export that carries normals
pub const MODEL_OBJ: &str = "model.obj";

/// File name of the geometry-only export
pub const MODEL_GEOM_OBJ: &str = "model_geom.obj";

/// One conversion request, built once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    /// Input mesh file
    pub file_path: PathBuf,
    /// Directory receiving both OBJ files
    pub output_dir: PathBuf,
    /// Log progress messages
    pub verbose: bool,
}

/// Paths of the files written by [`process`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutputs {
    pub model: PathBuf,
    pub geometry: PathBuf,
}

/// Convert one mesh file into `model.obj` and `model_geom.obj`.
///
/// The output directory (and its parents) is created first. Any failure
/// aborts the conversion; files already written are left in place.
pub fn process(config: &InvocationConfig) -> Result<ConvertOutputs> {
    let output_dir = &config.output_dir;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    if config.verbose {
        tracing::info!("Creating output directory: {}", output_dir.display());
    }

    let mesh = mesh::load(&config.file_path)?;
    if config.verbose {
        tracing::info!("Loaded mesh from {}.", config.file_path.display());
        tracing::info!(
            "Mesh: {} vertices, {} faces, normals={}, uvs={}, colors={}",
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.normals.is_some(),
            mesh.uvs.is_some(),
            mesh.colors.is_some()
        );
    }

    let model = output_dir.join(MODEL_OBJ);
    export(&mesh, &model, &ObjOptions::with_normals())?;
    tracing::info!("Exported OBJ to: {}", model.display());

    let obj_text = export_obj(&mesh, &ObjOptions::geometry_only())?;

    let geometry = output_dir.join(MODEL_GEOM_OBJ);
    write_text(&geometry, &obj_text)?;
    tracing::info!("Exported geometry to: {}", geometry.display());

    Ok(ConvertOutputs { model, geometry })
}

/// Write text verbatim, replacing any existing file
fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to write output: {:?}", path))?;
    Ok(())
}
