//! Engine data structures: models, textures and instances.
//!
//! - `model` contains the vertex format, GPU meshes and materials
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-object transformation data

pub mod instance;
pub mod model;
pub mod texture;
