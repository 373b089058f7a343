//! phong-desk
//!
//! A small real-time 3D demo: a desk scene built from procedurally generated
//! meshes (plane, sphere, cylinders, box), lit by several point lights with a
//! Phong shader and explored with a free-fly camera.
//!
//! High-level modules
//! - `shapes`: procedural mesh generation, pure CPU code
//! - `camera`: camera types, controller and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, materials, instances, textures
//! - `flow`: the event loop and the `GraphicsFlow` trait
//! - `pipelines`: the Phong pipeline and the point lights with their lamp pipeline
//! - `resources`: helpers to load textures and upload meshes
//! - `render`: render composition, batched per pipeline
//! - `scene`: the desk scene itself
//! - `config`: startup configuration
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shapes;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use flow::run;
