use wgpu::util::DeviceExt;

use crate::{
    data_structures::{instance::Instance, model},
    shapes::ShapeData,
};

/// Upload generated shape data into vertex and index buffers.
pub fn upload_shape(device: &wgpu::Device, shape: &ShapeData, name: &str) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&shape.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&shape.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    log::debug!(
        "uploaded {name}: {} vertices, {} indices",
        shape.vertices.len(),
        shape.indices.len()
    );

    model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: shape.num_indices(),
    }
}

/// Per-instance vertex buffer holding the raw transforms of `instances`.
pub fn mk_instance_buffer(device: &wgpu::Device, instances: &[Instance], name: &str) -> wgpu::Buffer {
    let raw: Vec<_> = instances.iter().map(Instance::to_raw).collect();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Instance Buffer", name)),
        contents: bytemuck::cast_slice(&raw),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}
