//! Render pipelines: the lit Phong pipeline and the unlit lamp markers.

pub mod basic;
pub mod light;
