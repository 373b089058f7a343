#![allow(dead_code)]

use cgmath::{InnerSpace, Vector3};
use phong_desk::shapes::ShapeData;

fn vec(v: [f32; 3]) -> Vector3<f32> {
    v.into()
}

/// Checks the invariants every generated shape has to hold: indices in range,
/// whole triangles, unit normals, texture coordinates in [0, 1] and outward
/// counter-clockwise winding.
pub fn assert_well_formed(shape: &ShapeData) {
    assert_eq!(shape.indices.len() % 3, 0, "indices must form whole triangles");
    assert!(
        shape
            .indices
            .iter()
            .all(|&i| (i as usize) < shape.vertices.len()),
        "index out of range"
    );
    for v in &shape.vertices {
        assert!((vec(v.normal).magnitude() - 1.0).abs() < 1e-4);
        assert!(v.tex_coords.iter().all(|t| (0.0..=1.0).contains(t)));
    }
    for tri in shape.indices.chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| shape.vertices[i as usize]);
        let face = (vec(b.position) - vec(a.position)).cross(vec(c.position) - vec(a.position));
        let normal = vec(a.normal) + vec(b.normal) + vec(c.normal);
        assert!(face.dot(normal) > 0.0, "triangle {tri:?} winds inwards");
    }
}

/// Axis-aligned bounds of a shape as (min, max).
pub fn bounds(shape: &ShapeData) -> ([f32; 3], [f32; 3]) {
    shape.vertices.iter().fold(
        ([f32::MAX; 3], [f32::MIN; 3]),
        |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
            (min, max)
        },
    )
}

/// A device on wgpu's no-op backend, so GPU resource code runs headless.
pub async fn noop_device() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions::default())
        .await
        .expect("noop adapter");
    adapter
        .request_device(&wgpu::DeviceDescriptor::default())
        .await
        .expect("noop device")
}

/// Encode a solid RGBA image of the given size as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encoding");
    bytes
}
