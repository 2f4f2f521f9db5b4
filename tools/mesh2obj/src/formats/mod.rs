//! Output formats

pub mod obj;

pub use obj::{export, export_obj, write_obj, ObjOptions};
