//! Mesh loading (glTF/GLB/OBJ -> merged triangle mesh)

mod gltf;
mod normals;
mod obj;
mod types;

use anyhow::{bail, Result};
use std::path::Path;

// Re-export public API
pub use self::gltf::load_gltf;
pub use normals::compute_vertex_normals;
pub use obj::load_obj;
pub use types::Mesh;

/// Load any supported mesh file as a single merged mesh.
///
/// The format is picked from the file extension. Scenes are always flattened
/// into one mesh.
pub fn load(input: &Path) -> Result<Mesh> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "gltf" | "glb" => load_gltf(input),
        "obj" => load_obj(input),
        _ => bail!(
            "Unsupported mesh format: {:?} (use .gltf, .glb, or .obj)",
            input
        ),
    }
}
