//! Procedural mesh generation.
//!
//! Builds the CPU-side vertex and index data for the primitives of the desk
//! scene: a subdivided plane, a latitude/longitude sphere, capped cylinders
//! and axis-aligned boxes. All generators emit [`ModelVertex`] data with unit
//! normals, texture coordinates in `[0, 1]` and counter-clockwise winding as
//! seen from outside the surface, which is what the back-face culling of the
//! render pipelines expects.
//!
//! Indices are `u16`, so every generator rejects parameters whose vertex
//! count would not fit a 16-bit index buffer.

use std::f32::consts::PI;

use anyhow::{Result, ensure};
use cgmath::{ElementWise, Vector3};

use crate::data_structures::model::ModelVertex;

/// Default grid size of [`make_plane`].
pub const DEFAULT_PLANE_DIMENSIONS: u32 = 10;
/// Default number of stacks and slices of [`make_sphere`].
pub const DEFAULT_SPHERE_TESSELATION: u32 = 20;
/// Default number of slices of [`make_cylinder`].
pub const DEFAULT_CYLINDER_SLICES: u32 = 10;

const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Generated mesh data ready to be uploaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u16>,
}

impl ShapeData {
    fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_buffer_size(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<ModelVertex>()
    }

    pub fn index_buffer_size(&self) -> usize {
        self.indices.len() * std::mem::size_of::<u16>()
    }

    fn push_vertex(&mut self, position: Vector3<f32>, tex_coords: [f32; 2], normal: Vector3<f32>) -> u16 {
        let index = self.vertices.len() as u16;
        self.vertices
            .push(ModelVertex::new(position.into(), tex_coords, normal.into()));
        index
    }

    fn push_triangle(&mut self, a: u16, b: u16, c: u16) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

fn ensure_fits_u16(shape: &str, vertices: usize) -> Result<()> {
    ensure!(
        vertices <= MAX_VERTICES,
        "{shape} would need {vertices} vertices, more than a 16-bit index buffer can address"
    );
    Ok(())
}

fn ensure_positive(shape: &str, name: &str, value: f32) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{shape}: {name} must be a positive finite number, got {value}"
    );
    Ok(())
}

/// A `dimensions` x `dimensions` grid on the XZ plane, centred on the origin
/// with unit spacing and facing +Y.
///
/// Texture coordinates stretch once across the whole grid. Each grid cell is
/// split into two triangles.
pub fn make_plane(dimensions: u32) -> Result<ShapeData> {
    ensure!(
        dimensions >= 2,
        "plane: dimensions must be at least 2, got {dimensions}"
    );
    let d = dimensions as usize;
    ensure_fits_u16("plane", d * d)?;

    let cells = d - 1;
    let mut shape = ShapeData::with_capacity(d * d, cells * cells * 6);
    let half = cells as f32 / 2.0;
    let up = Vector3::unit_y();

    for row in 0..d {
        for col in 0..d {
            let position = Vector3::new(col as f32 - half, 0.0, row as f32 - half);
            let uv = [col as f32 / cells as f32, row as f32 / cells as f32];
            shape.push_vertex(position, uv, up);
        }
    }

    for row in 0..cells {
        for col in 0..cells {
            let top_left = (row * d + col) as u16;
            let top_right = top_left + 1;
            let bottom_left = top_left + d as u16;
            let bottom_right = bottom_left + 1;
            shape.push_triangle(top_left, bottom_left, top_right);
            shape.push_triangle(top_right, bottom_left, bottom_right);
        }
    }

    Ok(shape)
}

/// A unit sphere with `tesselation` stacks and `tesselation` slices.
///
/// Stacks run from the north pole (+Y, v = 0) to the south pole (v = 1). The
/// seam column is duplicated so the texture wraps without a visible jump.
/// The quads touching a pole collapse to a single triangle.
pub fn make_sphere(tesselation: u32) -> Result<ShapeData> {
    ensure!(
        tesselation >= 3,
        "sphere: tesselation must be at least 3, got {tesselation}"
    );
    let t = tesselation as usize;
    let columns = t + 1;
    ensure_fits_u16("sphere", columns * columns)?;

    let mut shape = ShapeData::with_capacity(columns * columns, 6 * t * (t - 1));

    for stack in 0..=t {
        let phi = PI * stack as f32 / t as f32;
        let (ring_radius, y) = phi.sin_cos();
        for slice in 0..=t {
            let theta = 2.0 * PI * slice as f32 / t as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let position = Vector3::new(ring_radius * sin_theta, y, ring_radius * cos_theta);
            let uv = [slice as f32 / t as f32, stack as f32 / t as f32];
            shape.push_vertex(position, uv, position);
        }
    }

    for stack in 0..t {
        for slice in 0..t {
            let upper = (stack * columns + slice) as u16;
            let lower = upper + columns as u16;
            let upper_next = upper + 1;
            let lower_next = lower + 1;
            if stack != 0 {
                shape.push_triangle(upper, lower, upper_next);
            }
            if stack != t - 1 {
                shape.push_triangle(upper_next, lower, lower_next);
            }
        }
    }

    Ok(shape)
}

/// A capped cylinder centred on the origin with its axis along Y.
///
/// The side band uses outward normals, `u` running around the axis and `v`
/// running from the top edge (0) to the bottom edge (1). Both caps are
/// triangle fans with planar texture coordinates.
pub fn make_cylinder(radius: f32, height: f32, slices: u32) -> Result<ShapeData> {
    ensure_positive("cylinder", "radius", radius)?;
    ensure_positive("cylinder", "height", height)?;
    ensure!(
        slices >= 3,
        "cylinder: slices must be at least 3, got {slices}"
    );
    let s = slices as usize;
    ensure_fits_u16("cylinder", 4 * s + 6)?;

    let mut shape = ShapeData::with_capacity(4 * s + 6, 12 * s);
    let half_height = height / 2.0;
    let angle = |i: usize| 2.0 * PI * i as f32 / s as f32;

    // side band: a top and a bottom vertex per column
    let side_start = shape.vertices.len() as u16;
    for i in 0..=s {
        let (sin_theta, cos_theta) = angle(i).sin_cos();
        let normal = Vector3::new(sin_theta, 0.0, cos_theta);
        let u = i as f32 / s as f32;
        shape.push_vertex(
            Vector3::new(radius * sin_theta, half_height, radius * cos_theta),
            [u, 0.0],
            normal,
        );
        shape.push_vertex(
            Vector3::new(radius * sin_theta, -half_height, radius * cos_theta),
            [u, 1.0],
            normal,
        );
    }
    for i in 0..s as u16 {
        let top = side_start + 2 * i;
        let bottom = top + 1;
        let top_next = top + 2;
        let bottom_next = top + 3;
        shape.push_triangle(top, bottom, top_next);
        shape.push_triangle(top_next, bottom, bottom_next);
    }

    for (y, normal) in [
        (half_height, Vector3::unit_y()),
        (-half_height, -Vector3::unit_y()),
    ] {
        let center = shape.push_vertex(Vector3::new(0.0, y, 0.0), [0.5, 0.5], normal);
        for i in 0..=s {
            let (sin_theta, cos_theta) = angle(i).sin_cos();
            shape.push_vertex(
                Vector3::new(radius * sin_theta, y, radius * cos_theta),
                [0.5 + 0.5 * sin_theta, 0.5 + 0.5 * cos_theta],
                normal,
            );
        }
        for i in 0..s as u16 {
            let rim = center + 1 + i;
            if normal.y > 0.0 {
                shape.push_triangle(center, rim, rim + 1);
            } else {
                shape.push_triangle(center, rim + 1, rim);
            }
        }
    }

    Ok(shape)
}

/// An axis-aligned box spanning `min`..`max` with flat per-face normals.
///
/// Every face gets its own four vertices so texture coordinates run 0..1
/// across each face.
pub fn make_box(min: [f32; 3], max: [f32; 3]) -> Result<ShapeData> {
    let min = Vector3::from(min);
    let max = Vector3::from(max);
    for axis in 0..3 {
        ensure!(
            min[axis].is_finite() && max[axis].is_finite() && min[axis] < max[axis],
            "box: min must be strictly below max on every axis, got {min:?}..{max:?}"
        );
    }

    let center = (min + max) / 2.0;
    let extent = (max - min) / 2.0;
    // (normal, u axis, v axis) with u x v == normal
    let faces = [
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
    ];

    let mut shape = ShapeData::with_capacity(24, 36);
    for (normal, u, v) in faces {
        let face_center = center + normal.mul_element_wise(extent);
        let u = u.mul_element_wise(extent);
        let v = v.mul_element_wise(extent);
        let first = shape.push_vertex(face_center - u - v, [0.0, 1.0], normal);
        shape.push_vertex(face_center + u - v, [1.0, 1.0], normal);
        shape.push_vertex(face_center + u + v, [1.0, 0.0], normal);
        shape.push_vertex(face_center - u + v, [0.0, 0.0], normal);
        shape.push_triangle(first, first + 1, first + 2);
        shape.push_triangle(first, first + 2, first + 3);
    }

    Ok(shape)
}
