//! Render composition and pipeline batching.
//!
//! A flow describes what it wants drawn each frame with a [`Render`]. The
//! event loop walks every flow's render tree, sorts the leaves into one batch
//! per pipeline and then draws each batch with a single `set_pipeline`.
//!
//! - [`Lit`] is a textured mesh drawn with the Phong pipeline
//! - [`Lamps`] is a mesh drawn once per point light with the unlit lamp pipeline

use crate::data_structures::model::{Material, Mesh};

/// A mesh, its material and the buffer holding `amount` instance transforms.
pub struct Lit<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub instance: &'a wgpu::Buffer,
    pub amount: usize,
}

/// Lamp markers. Instance `i` takes the colour of point light `i`.
pub struct Lamps<'a> {
    pub mesh: &'a Mesh,
    pub instance: &'a wgpu::Buffer,
    pub amount: usize,
}

pub enum Render<'a> {
    Lits(Vec<Lit<'a>>),
    Lamps(Lamps<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, lits: &mut Vec<Lit<'a>>, lamps: &mut Vec<Lamps<'a>>) {
        match self {
            Render::Lits(mut vec) => lits.append(&mut vec),
            Render::Lamps(lamp) => lamps.push(lamp),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(lits, lamps)),
        }
    }
}
