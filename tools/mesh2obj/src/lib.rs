//! mesh2obj - mesh to OBJ converter
//!
//! Loads a glTF/GLB/OBJ file as one merged mesh and writes two OBJ exports:
//! `model.obj` (with normals) and `model_geom.obj` (positions and faces only).

pub mod convert;
pub mod formats;
pub mod mesh;

pub use convert::{process, ConvertOutputs, InvocationConfig, MODEL_GEOM_OBJ, MODEL_OBJ};
pub use formats::{export, export_obj, write_obj, ObjOptions};
pub use mesh::{load, Mesh};
